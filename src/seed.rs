//! Детерминированные потоки случайных чисел.
//!
//! Каждый этап, которому нужна случайность, получает собственный поток,
//! выведенный из сида мира. Поэтому порядок вызовов и параллельный обход
//! тайлов не меняют результат.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Именованный поток случайных чисел
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    /// Перемешивание таблицы перестановок шума
    Permutation,
    /// Центры островов в режиме архипелага
    Islands,
    /// Выбор истоков рек
    RiverSources,
}

impl Stream {
    fn offset(self) -> u64 {
        match self {
            Stream::Permutation => 0,
            Stream::Islands => 1_000_000,
            Stream::RiverSources => 2_000_000,
        }
    }
}

/// Возвращает генератор для потока `stream` мира с сидом `seed`.
#[must_use]
pub fn stream_rng(seed: u64, stream: Stream) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed.wrapping_add(stream.offset()))
}
