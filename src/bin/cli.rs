use clap::Parser;
use rand::Rng;
use std::path::PathBuf;
use terragen::{ShapeMode, TerrainGenerator, TerrainParams, Wind};
use tracing_subscriber::EnvFilter;

/// Генератор рельефа: высоты, реки, влажность и биомы
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Базовые параметры в формате TOML (флаги ниже их переопределяют)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Ширина карты (минимум 50)
    #[arg(long)]
    width: Option<u32>,

    /// Высота карты (минимум 50)
    #[arg(long)]
    height: Option<u32>,

    /// Сид для детерминированной генерации (по умолчанию случайный)
    #[arg(long)]
    seed: Option<u64>,

    /// Режим формы суши
    #[arg(long, value_enum)]
    mode: Option<ShapeMode>,

    /// Количество октав шума (детализация)
    #[arg(long)]
    octaves: Option<u32>,

    /// Масштаб шума (больше — крупнее формы)
    #[arg(long)]
    scale: Option<f32>,

    /// Количество рек
    #[arg(long)]
    rivers: Option<usize>,

    /// Преобладающий ветер
    #[arg(long, value_enum)]
    wind: Option<Wind>,

    /// Путь для сохранения JSON-артефакта
    #[arg(short, long)]
    output: PathBuf,

    /// Подробный лог (уровень debug)
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn into_params(self) -> Result<(TerrainParams, PathBuf), terragen::TerrainError> {
        let mut params = match &self.config {
            Some(path) => TerrainParams::from_toml_file(path)?,
            None => TerrainParams::with_seed(rand::thread_rng().gen_range(0..1_000_000)),
        };

        if let Some(seed) = self.seed {
            params.seed = seed;
        }
        if let Some(width) = self.width {
            params.width = width;
        }
        if let Some(height) = self.height {
            params.height = height;
        }
        if let Some(mode) = self.mode {
            params.mode = mode;
        }
        if let Some(octaves) = self.octaves {
            params.octaves = octaves;
        }
        if let Some(scale) = self.scale {
            params.scale = scale;
        }
        if let Some(rivers) = self.rivers {
            params.river_count = rivers;
        }
        if let Some(wind) = self.wind {
            params.prevailing_wind = wind;
        }
        Ok((params, self.output))
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    println!("🔍 Загрузка параметров...");
    let (params, output) = cli.into_params()?;

    let generator = TerrainGenerator::new(params)?;
    let terrain = generator.generate()?;

    println!("Сохранение в {}", output.display());
    terrain.save_json(&output)?;

    let params = generator.params();
    println!("\nГотово! Рельеф сохранён.");
    println!("  Сид: {}", params.seed);
    println!("  Размер: {}×{}", params.width, params.height);
    println!("  Рек: {}", terrain.rivers.len());
    println!(
        "  Средняя высота суши: {:.3}",
        terrain.average_land_elevation()
    );
    Ok(())
}
