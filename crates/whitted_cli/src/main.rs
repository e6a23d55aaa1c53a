use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use whitted_core::{load_scene, scene_to_json, Scene};
use whitted_renderer::{
    checksum, encode_ppm, render, save, RefractionFallback, RenderConfig, ShadowExclusion,
};

/// Handling of total internal reflection in refracted rays.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum TirMode {
    /// Refracted term becomes the background color
    Background,
    /// Refracted term is dropped
    Black,
}

impl From<TirMode> for RefractionFallback {
    fn from(mode: TirMode) -> Self {
        match mode {
            TirMode::Background => RefractionFallback::Background,
            TirMode::Black => RefractionFallback::Black,
        }
    }
}

/// Spheres ignored by shadow rays.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum ShadowMode {
    /// Only the light itself
    LightOnly,
    /// The light and the shaded sphere
    LightAndSelf,
}

impl From<ShadowMode> for ShadowExclusion {
    fn from(mode: ShadowMode) -> Self {
        match mode {
            ShadowMode::LightOnly => ShadowExclusion::LightOnly,
            ShadowMode::LightAndSelf => ShadowExclusion::LightAndSelf,
        }
    }
}

#[derive(Parser)]
#[command(name = "whitted")]
#[command(version)]
#[command(about = "Recursive Whitted-style ray tracer for sphere scenes")]
#[command(long_about = "
whitted renders scenes made of spheres with reflection, refraction and
point lights, and writes the result as a binary PPM or PNG image.

Example usage:
  whitted render --output result.ppm
  whitted render --scene scene.json --output scene.png
  whitted scene > reference.json
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a scene to an image file
    Render {
        /// JSON scene description (defaults to the built-in reference scene)
        #[arg(short, long)]
        scene: Option<PathBuf>,

        /// Output image; `.ppm` or `.png`
        #[arg(short, long, default_value = "result.ppm")]
        output: PathBuf,

        /// Image width in pixels
        #[arg(long, default_value_t = 640)]
        width: u32,

        /// Image height in pixels
        #[arg(long, default_value_t = 480)]
        height: u32,

        /// Field of view in degrees
        #[arg(long, default_value_t = 30.0)]
        fov: f32,

        /// Maximum reflection/refraction depth
        #[arg(long, default_value_t = 5)]
        max_depth: u32,

        /// Total internal reflection handling
        #[arg(long, value_enum, default_value_t = TirMode::Background)]
        tir: TirMode,

        /// Spheres ignored when testing shadow rays
        #[arg(long, value_enum, default_value_t = ShadowMode::LightOnly)]
        shadow: ShadowMode,

        /// Print the FNV-1a checksum of the encoded PPM
        #[arg(long)]
        checksum: bool,
    },
    /// Print the built-in reference scene as JSON
    Scene,
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            scene,
            output,
            width,
            height,
            fov,
            max_depth,
            tir,
            shadow,
            checksum: print_checksum,
        } => {
            if width == 0 || height == 0 {
                anyhow::bail!("Image size must be non-zero, got {}x{}", width, height);
            }

            let scene = match scene {
                Some(path) => load_scene(&path)
                    .with_context(|| format!("Failed to load scene {}", path.display()))?,
                None => {
                    log::info!("Using built-in reference scene");
                    Scene::reference()
                }
            };

            let config = RenderConfig::default()
                .with_resolution(width, height)
                .with_fov(fov)
                .with_max_depth(max_depth)
                .with_refraction_fallback(tir.into())
                .with_shadow_exclusion(shadow.into());

            let image = render(&scene, &config);

            save(&image, &output)
                .with_context(|| format!("Failed to write image {}", output.display()))?;

            if print_checksum {
                println!("{:016x}", checksum(&encode_ppm(&image)));
            }
        }
        Commands::Scene => {
            let json = scene_to_json(&Scene::reference())
                .context("Failed to serialize reference scene")?;
            println!("{}", json);
        }
    }

    Ok(())
}
