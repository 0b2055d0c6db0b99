use image::{Rgb, RgbImage};
use std::path::Path;

/// Writes a small two-class dataset to `test_dataset/` for trying the CLI
fn main() -> anyhow::Result<()> {
    let root = Path::new("test_dataset");

    for (label, tint) in [("cat", [200u8, 120, 40]), ("dog", [40u8, 120, 200])] {
        let dir = root.join(label);
        std::fs::create_dir_all(&dir)?;

        for i in 0..4u32 {
            let mut img = RgbImage::new(160, 120);
            // Gradient tinted per class, shifted per image
            for (x, y, pixel) in img.enumerate_pixels_mut() {
                let r = ((x + i * 20) * tint[0] as u32 / 160).min(255) as u8;
                let g = (y * tint[1] as u32 / 120) as u8;
                *pixel = Rgb([r, g, tint[2]]);
            }
            img.save(dir.join(format!("{:02}.jpg", i)))?;
        }
    }

    println!("Created {} (2 labels x 4 images)", root.display());
    println!("Try: cargo run -- augment test_dataset --out augmented --seed 1");
    Ok(())
}
