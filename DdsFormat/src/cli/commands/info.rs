//! CLI command for DDS header inspection

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use console::style;

use crate::texture::MipmappedTexture;

/// Show info about a DDS texture file
pub fn execute(path: &Path) -> anyhow::Result<()> {
    let mut reader = BufReader::new(File::open(path)?);
    let texture = MipmappedTexture::read_dds(&mut reader)
        .map_err(|e| anyhow::anyhow!("Failed to read DDS: {e}"))?;

    println!("{} {}", style("DDS Information:").bold(), path.display());
    println!();
    println!("Dimensions: {}x{}", texture.width(), texture.height());
    println!("Format: {}", texture.format().name());
    println!("Alpha: {}", if texture.has_alpha() { "yes" } else { "no" });
    println!("Mip levels: {}", texture.level_count());
    println!("Faces: {}", texture.face_count());
    if texture.is_cubemap() {
        println!("Cube map: yes");
    }

    Ok(())
}
