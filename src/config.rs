use std::path::PathBuf;

use clap::Parser;

use crate::shading::{ShadingConfig, Technique};

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Compares normal, bump and parallax mapping on a textured plane", long_about = None)]
pub struct Config {
    /// Technique shown at startup
    #[arg(long, value_enum, default_value_t = Technique::Normal)]
    pub technique: Technique,

    /// Texture set prefix; loads PREFIX_base, PREFIX_normal and PREFIX_height.
    /// A procedural brick wall is used when omitted.
    #[arg(long, value_name = "PREFIX")]
    pub textures: Option<PathBuf>,

    /// File extension of the texture set
    #[arg(long, default_value = "jpg", value_name = "EXT")]
    pub extension: String,

    /// Initial plane subdivision level (2, 4, 16, 64, 256 or 1024 quads per side)
    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=5))]
    pub detail: u8,

    #[arg(long, default_value_t = ShadingConfig::DEFAULT_AMBIENT, value_parser = non_negative)]
    pub ambient: f32,

    #[arg(long, default_value_t = ShadingConfig::DEFAULT_SPECULAR, value_parser = non_negative)]
    pub specular: f32,

    #[arg(long, default_value_t = ShadingConfig::DEFAULT_SHININESS, value_parser = non_negative)]
    pub shininess: f32,

    /// Parallax displacement per unit of height
    #[arg(long, default_value_t = ShadingConfig::DEFAULT_HEIGHT_SCALE, value_parser = non_negative)]
    pub height_scale: f32,

    /// Slope per texel of height difference used by bump mapping
    #[arg(long, default_value_t = ShadingConfig::DEFAULT_BUMP_STRENGTH, value_parser = non_negative)]
    pub bump_strength: f32,

    /// Render a single frame on the CPU to this image file instead of opening a window
    #[arg(long, value_name = "PATH")]
    pub snapshot: Option<PathBuf>,

    #[arg(long, default_value_t = 900, value_parser = clap::value_parser!(u32).range(1..))]
    pub width: u32,

    #[arg(long, default_value_t = 700, value_parser = clap::value_parser!(u32).range(1..))]
    pub height: u32,
}

impl Config {
    pub fn shading(&self) -> ShadingConfig {
        ShadingConfig {
            ambient: self.ambient,
            specular: self.specular,
            shininess: self.shininess,
            height_scale: self.height_scale,
            bump_strength: self.bump_strength,
        }
    }
}

fn non_negative(s: &str) -> Result<f32, String> {
    let value: f32 = s.parse().map_err(|e| format!("`{}` is not a number: {}", s, e))?;
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(format!("`{}` must be a finite, non-negative number", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_defaults() {
        let config = Config::try_parse_from(["displacement-demo"]).unwrap();
        assert_eq!(config.technique, Technique::Normal);
        assert!(config.textures.is_none());
        assert_eq!(config.extension, "jpg");
        assert_eq!(config.detail, 0);
        assert_eq!(config.shading(), ShadingConfig::default());
        assert!(config.snapshot.is_none());
        assert_eq!((config.width, config.height), (900, 700));
    }

    #[test]
    fn test_overrides() {
        let config = Config::try_parse_from([
            "displacement-demo",
            "--technique", "parallax",
            "--textures", "resources/textures/wall",
            "--extension", "png",
            "--detail", "3",
            "--height-scale", "0.05",
            "--bump-strength", "2",
            "--snapshot", "out.png",
        ])
        .unwrap();

        assert_eq!(config.technique, Technique::Parallax);
        assert_eq!(config.textures.as_deref(), Some(Path::new("resources/textures/wall")));
        assert_eq!(config.extension, "png");
        assert_eq!(config.detail, 3);
        assert_eq!(config.shading().height_scale, 0.05);
        assert_eq!(config.shading().bump_strength, 2.0);
        assert_eq!(config.snapshot.as_deref(), Some(Path::new("out.png")));
    }

    #[test]
    fn test_rejects_invalid_values() {
        assert!(Config::try_parse_from(["displacement-demo", "--detail", "6"]).is_err());
        assert!(Config::try_parse_from(["displacement-demo", "--height-scale", "-0.1"]).is_err());
        assert!(Config::try_parse_from(["displacement-demo", "--shininess", "shiny"]).is_err());
        assert!(Config::try_parse_from(["displacement-demo", "--technique", "relief"]).is_err());
        assert!(Config::try_parse_from(["displacement-demo", "--width", "0"]).is_err());
    }
}
