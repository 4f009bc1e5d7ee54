//! 对象 key 的分类与输出 key 推导
//!
//! 纯函数，不涉及任何 I/O。

use phf::phf_map;

/// 输出 key 前缀
pub const OUTPUT_PREFIX: &str = "result_";
/// 输出 key 后缀
pub const OUTPUT_EXTENSION: &str = ".md";

/// 允许处理的图片后缀 → MIME 子类型（`jpg` 规范化为 `jpeg`）
static IMAGE_SUBTYPES: phf::Map<&'static str, &'static str> = phf_map! {
    "png" => "png",
    "jpg" => "jpeg",
    "jpeg" => "jpeg",
    "webp" => "webp",
};

/// 输入对象分类结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputKind {
    /// 可处理的图片，附带 MIME 类型，例如 `image/jpeg`
    Image { mime_type: String },
    /// 目录占位对象（以 `/` 结尾）
    Directory,
    /// 不在白名单内的文件
    Unsupported,
}

/// 对输入 key 进行分类
pub fn classify(key: &str) -> InputKind {
    if key.ends_with('/') {
        return InputKind::Directory;
    }

    match image_subtype(key) {
        Some(subtype) => InputKind::Image {
            mime_type: format!("image/{}", subtype),
        },
        None => InputKind::Unsupported,
    }
}

/// 根据后缀（忽略大小写）查找 MIME 子类型
pub fn image_subtype(key: &str) -> Option<&'static str> {
    let (_, ext) = key.rsplit_once('.')?;
    IMAGE_SUBTYPES.get(ext.to_ascii_lowercase().as_str()).copied()
}

/// 推导输出 key：去掉扩展名，`.` 与 `/` 替换为 `_`，加上前缀与 `.md`
///
/// `folder/Q2.jpg` → `result_folder_Q2.md`
pub fn output_key(input_key: &str) -> String {
    let stem = match split_extension(input_key) {
        Some((stem, _)) => stem,
        None => input_key,
    };
    let sanitized = stem.replace(['.', '/'], "_");
    format!("{}{}{}", OUTPUT_PREFIX, sanitized, OUTPUT_EXTENSION)
}

/// 拆分最后一段路径中的扩展名
///
/// 与常见 splitext 语义一致：文件名开头的 `.`（隐藏文件）不算扩展名。
fn split_extension(key: &str) -> Option<(&str, &str)> {
    let name_start = key.rfind('/').map(|i| i + 1).unwrap_or(0);
    let name = &key[name_start..];
    let dot = name.rfind('.')?;
    if name[..dot].chars().all(|c| c == '.') {
        return None;
    }
    let split_at = name_start + dot;
    Some((&key[..split_at], &key[split_at + 1..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_key_examples() {
        assert_eq!(output_key("Q1.png"), "result_Q1.md");
        assert_eq!(output_key("folder/Q2.jpg"), "result_folder_Q2.md");
    }

    #[test]
    fn test_output_key_replaces_inner_dots() {
        assert_eq!(
            output_key("2025.12/Screenshot 2025.12.13.png"),
            "result_2025_12_Screenshot 2025_12_13.md"
        );
        assert_eq!(output_key("a.b/noext"), "result_a_b_noext.md");
        assert_eq!(output_key(".png"), "result__png.md");
    }

    #[test]
    fn test_jpg_normalized_to_jpeg() {
        assert_eq!(
            classify("folder/Q2.jpg"),
            InputKind::Image {
                mime_type: "image/jpeg".to_string()
            }
        );
        assert_eq!(
            classify("Q3.JPEG"),
            InputKind::Image {
                mime_type: "image/jpeg".to_string()
            }
        );
    }

    #[test]
    fn test_allowed_suffixes_case_insensitive() {
        assert_eq!(image_subtype("a.PNG"), Some("png"));
        assert_eq!(image_subtype("a.webp"), Some("webp"));
        assert_eq!(image_subtype("dir.png/file"), None);
    }

    #[test]
    fn test_non_images_rejected() {
        assert_eq!(classify("notes.txt"), InputKind::Unsupported);
        assert_eq!(classify("exam.pdf"), InputKind::Unsupported);
        assert_eq!(classify("README"), InputKind::Unsupported);
        assert_eq!(classify("screens/"), InputKind::Directory);
        assert_eq!(classify("screens.png/"), InputKind::Directory);
    }
}
