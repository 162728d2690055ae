//! 影像文件检查
//!
//! 外壳只做格式识别：扩展名在允许列表中，并且文件头与该格式的签名一致。

use anyhow::{bail, Context, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// 允许的扩展名
pub const ACCEPTED_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "bmp"];

/// 加载失败时向用户展示的提示
pub const LOAD_FAILED: &str = "Не удалось загрузить изображение";

/// 影像格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Bmp,
}

impl ImageFormat {
    fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "png" => Some(ImageFormat::Png),
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            "bmp" => Some(ImageFormat::Bmp),
            _ => None,
        }
    }

    fn signature(&self) -> &'static [u8] {
        match self {
            ImageFormat::Png => b"\x89PNG\r\n\x1a\n",
            ImageFormat::Jpeg => b"\xff\xd8\xff",
            ImageFormat::Bmp => b"BM",
        }
    }
}

/// 检查影像文件，返回识别出的格式
pub fn inspect_image(path: &Path) -> Result<ImageFormat> {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default();
    let Some(format) = ImageFormat::from_extension(ext) else {
        bail!(
            "unsupported image extension '{}' (expected one of {})",
            ext,
            ACCEPTED_EXTENSIONS.join(", ")
        );
    };

    let file = File::open(path)
        .with_context(|| format!("Failed to open image {}", path.display()))?;
    let matches = has_signature(file, format)
        .with_context(|| format!("Failed to read image {}", path.display()))?;

    if !matches {
        bail!("{} is not a valid {:?} image", path.display(), format);
    }
    Ok(format)
}

/// 读取至多 8 字节文件头并与签名比较，短读会继续读取直到文件结束
fn has_signature(reader: impl Read, format: ImageFormat) -> std::io::Result<bool> {
    let mut header = Vec::with_capacity(8);
    reader.take(8).read_to_end(&mut header)?;
    Ok(header.starts_with(format.signature()))
}
