//! Ошибки генерации рельефа.
//!
//! Ошибкой считается только неверная конфигурация (или сбой ввода-вывода).
//! Меньшее число рек, карта целиком из воды или суши — это корректные
//! результаты, а не ошибки.

/// Ошибки, возникающие при загрузке параметров, генерации и сохранении.
#[derive(Debug, thiserror::Error)]
pub enum TerrainError {
    /// Карта меньше минимального размера по одной из осей.
    #[error("map size must be at least {min}x{min}, got {width}x{height}")]
    MapTooSmall { width: u32, height: u32, min: u32 },

    /// Параметр шума вне допустимой области (иначе высоты превратятся в NaN).
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter {
        name: &'static str,
        reason: &'static str,
    },

    /// Не удалось прочитать или записать файл.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Не удалось разобрать TOML-конфигурацию.
    #[error("failed to parse config: {0}")]
    Toml(#[from] toml::de::Error),

    /// Не удалось (де)сериализовать артефакт.
    #[error("failed to (de)serialize terrain artifact: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_too_small_message() {
        let err = TerrainError::MapTooSmall {
            width: 10,
            height: 60,
            min: 50,
        };
        assert_eq!(err.to_string(), "map size must be at least 50x50, got 10x60");
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: TerrainError = io.into();
        assert!(matches!(err, TerrainError::Io(_)));
    }
}
