//! Product records, form validation, and accepted image uploads.

use chrono::{DateTime, Utc};
use serde::Serialize;

use stockroom_core::{Entity, ProductId, ValidationErrors};

use crate::stock::StockStatus;

/// Maximum length of a product name, in characters.
pub const NAME_MAX_CHARS: usize = 255;

/// Maximum size of an uploaded product image, in kilobytes.
pub const IMAGE_MAX_KILOBYTES: usize = 2048;

/// A persisted product record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: f64,
    pub description: Option<String>,
    pub stock: u32,
    pub low_stock_threshold: u32,
    /// Absolute URL or relative storage key; `None` means no image.
    pub image_path: Option<String>,
    /// Reserved; not interpreted by any business rule.
    pub category_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn stock_status(&self) -> StockStatus {
        StockStatus::classify(self.stock, self.low_stock_threshold)
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> ProductId {
        self.id
    }
}

/// Validated, storable product attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductFields {
    pub name: String,
    pub price: f64,
    pub description: Option<String>,
    pub stock: u32,
    pub low_stock_threshold: u32,
}

/// Image types accepted for product pictures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageType {
    Jpeg,
    Png,
    Bmp,
    Gif,
    Webp,
}

impl ImageType {
    /// Raster formats only. SVG is refused because uploads are served publicly.
    pub const ALL: [ImageType; 5] = [
        ImageType::Jpeg,
        ImageType::Png,
        ImageType::Bmp,
        ImageType::Gif,
        ImageType::Webp,
    ];

    pub fn mime(self) -> &'static str {
        match self {
            ImageType::Jpeg => "image/jpeg",
            ImageType::Png => "image/png",
            ImageType::Bmp => "image/bmp",
            ImageType::Gif => "image/gif",
            ImageType::Webp => "image/webp",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ImageType::Jpeg => "jpg",
            ImageType::Png => "png",
            ImageType::Bmp => "bmp",
            ImageType::Gif => "gif",
            ImageType::Webp => "webp",
        }
    }

    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or_default().trim();
        if essence.eq_ignore_ascii_case("image/jpg") {
            return Some(ImageType::Jpeg);
        }
        Self::ALL
            .into_iter()
            .find(|t| t.mime().eq_ignore_ascii_case(essence))
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        if ext.eq_ignore_ascii_case("jpeg") {
            return Some(ImageType::Jpeg);
        }
        Self::ALL
            .into_iter()
            .find(|t| t.extension().eq_ignore_ascii_case(ext))
    }

    /// Detect the format from the file's leading signature bytes.
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        match bytes {
            [0xFF, 0xD8, 0xFF, ..] => Some(ImageType::Jpeg),
            [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, ..] => Some(ImageType::Png),
            [b'G', b'I', b'F', b'8', b'7' | b'9', b'a', ..] => Some(ImageType::Gif),
            [b'B', b'M', ..] => Some(ImageType::Bmp),
            [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => {
                Some(ImageType::Webp)
            }
            _ => None,
        }
    }
}

/// An image file received with a create/update form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedImage {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadedImage {
    /// Image type the file contents actually carry, provided it agrees with the
    /// declared one.
    pub fn image_type(&self) -> Option<ImageType> {
        let declared = self.declared_type()?;
        (ImageType::sniff(&self.bytes) == Some(declared)).then_some(declared)
    }

    /// Type from the declared content type, falling back to the file extension.
    fn declared_type(&self) -> Option<ImageType> {
        if let Some(t) = self.content_type.as_deref().and_then(ImageType::from_mime) {
            return Some(t);
        }
        if self.content_type.is_some() && self.content_type.as_deref() != Some("application/octet-stream") {
            return None;
        }
        self.file_name
            .as_deref()
            .and_then(|n| n.rsplit_once('.'))
            .and_then(|(_, ext)| ImageType::from_extension(ext))
    }

    pub fn size_kilobytes(&self) -> usize {
        self.bytes.len().div_ceil(1024)
    }
}

/// Validated create/update input: attributes plus an optional replacement image.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDraft {
    pub fields: ProductFields,
    pub image: Option<UploadedImage>,
}

/// Raw create/update input, exactly as received.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductForm {
    pub name: Option<String>,
    pub price: Option<String>,
    pub description: Option<String>,
    pub stock: Option<String>,
    pub low_stock_threshold: Option<String>,
    pub image: Option<UploadedImage>,
}

impl ProductForm {
    /// Validate every field, collecting all failures.
    ///
    /// Strings are trimmed and empty strings count as absent.
    pub fn validate(self) -> Result<ProductDraft, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let name = match present(self.name) {
            None => {
                errors.add("name", required("name"));
                None
            }
            Some(name) if name.chars().count() > NAME_MAX_CHARS => {
                errors.add(
                    "name",
                    format!("The name field must not be greater than {NAME_MAX_CHARS} characters."),
                );
                None
            }
            Some(name) => Some(name),
        };

        let price = match present(self.price) {
            None => {
                errors.add("price", required("price"));
                None
            }
            Some(raw) => match raw.parse::<f64>() {
                Ok(v) if v.is_finite() && v >= 0.0 => Some(v),
                Ok(v) if v.is_finite() => {
                    errors.add("price", "The price field must be at least 0.");
                    None
                }
                _ => {
                    errors.add("price", "The price field must be a number.");
                    None
                }
            },
        };

        let stock = count_field(&mut errors, "stock", self.stock);
        let low_stock_threshold =
            count_field(&mut errors, "low_stock_threshold", self.low_stock_threshold);

        let image = self.image.filter(|img| !img.bytes.is_empty());
        if let Some(img) = &image {
            if img.image_type().is_none() {
                errors.add("image", "The image field must be an image.");
            }
            if img.size_kilobytes() > IMAGE_MAX_KILOBYTES {
                errors.add(
                    "image",
                    format!("The image field must not be greater than {IMAGE_MAX_KILOBYTES} kilobytes."),
                );
            }
        }

        match (name, price, stock, low_stock_threshold) {
            (Some(name), Some(price), Some(stock), Some(low_stock_threshold)) => {
                errors.into_result(ProductDraft {
                    fields: ProductFields {
                        name,
                        price,
                        description: present(self.description),
                        stock,
                        low_stock_threshold,
                    },
                    image,
                })
            }
            _ => Err(errors),
        }
    }
}

fn present(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn human(field: &str) -> String {
    field.replace('_', " ")
}

fn required(field: &str) -> String {
    format!("The {} field is required.", human(field))
}

fn count_field(errors: &mut ValidationErrors, field: &str, raw: Option<String>) -> Option<u32> {
    let Some(raw) = present(raw) else {
        errors.add(field, required(field));
        return None;
    };
    let Ok(value) = raw.parse::<i64>() else {
        errors.add(field, format!("The {} field must be an integer.", human(field)));
        return None;
    };
    if value < 0 {
        errors.add(field, format!("The {} field must be at least 0.", human(field)));
        return None;
    }
    match u32::try_from(value) {
        Ok(v) => Some(v),
        Err(_) => {
            errors.add(
                field,
                format!("The {} field must not be greater than {}.", human(field), u32::MAX),
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> ProductForm {
        ProductForm {
            name: Some("Coca-Cola 1.5L".to_string()),
            price: Some("2.49".to_string()),
            description: Some("  ".to_string()),
            stock: Some("12".to_string()),
            low_stock_threshold: Some("5".to_string()),
            image: None,
        }
    }

    const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    fn png(len: usize) -> UploadedImage {
        let mut bytes = vec![0u8; len];
        let head = len.min(PNG_SIGNATURE.len());
        bytes[..head].copy_from_slice(&PNG_SIGNATURE[..head]);
        UploadedImage {
            file_name: Some("cola.png".to_string()),
            content_type: Some("image/png".to_string()),
            bytes,
        }
    }

    #[test]
    fn valid_form_produces_draft() {
        let draft = form().validate().unwrap();
        assert_eq!(draft.fields.name, "Coca-Cola 1.5L");
        assert_eq!(draft.fields.price, 2.49);
        assert_eq!(draft.fields.description, None);
        assert_eq!(draft.fields.stock, 12);
        assert_eq!(draft.fields.low_stock_threshold, 5);
        assert!(draft.image.is_none());
    }

    #[test]
    fn missing_fields_are_all_reported() {
        let errors = ProductForm::default().validate().unwrap_err();
        assert_eq!(
            errors.fields().collect::<Vec<_>>(),
            vec!["low_stock_threshold", "name", "price", "stock"]
        );
        assert_eq!(
            errors.get("low_stock_threshold").unwrap(),
            ["The low stock threshold field is required."]
        );
    }

    #[test]
    fn name_longer_than_limit_is_rejected() {
        let mut f = form();
        f.name = Some("x".repeat(NAME_MAX_CHARS + 1));
        let errors = f.validate().unwrap_err();
        assert_eq!(
            errors.get("name").unwrap(),
            ["The name field must not be greater than 255 characters."]
        );

        let mut f = form();
        f.name = Some("é".repeat(NAME_MAX_CHARS));
        assert!(f.validate().is_ok());
    }

    #[test]
    fn price_must_be_a_non_negative_number() {
        for (raw, msg) in [
            ("abc", "The price field must be a number."),
            ("NaN", "The price field must be a number."),
            ("inf", "The price field must be a number."),
            ("-0.01", "The price field must be at least 0."),
        ] {
            let mut f = form();
            f.price = Some(raw.to_string());
            let errors = f.validate().unwrap_err();
            assert_eq!(errors.get("price").unwrap(), [msg], "{raw}");
        }
    }

    #[test]
    fn counts_must_be_non_negative_integers() {
        let mut f = form();
        f.stock = Some("-1".to_string());
        f.low_stock_threshold = Some("2.5".to_string());
        let errors = f.validate().unwrap_err();
        assert_eq!(errors.get("stock").unwrap(), ["The stock field must be at least 0."]);
        assert_eq!(
            errors.get("low_stock_threshold").unwrap(),
            ["The low stock threshold field must be an integer."]
        );
    }

    #[test]
    fn zero_counts_are_valid() {
        let mut f = form();
        f.stock = Some("0".to_string());
        f.low_stock_threshold = Some("0".to_string());
        let draft = f.validate().unwrap();
        assert_eq!(draft.fields.stock, 0);
        assert_eq!(draft.fields.low_stock_threshold, 0);
    }

    #[test]
    fn counts_beyond_u32_are_rejected() {
        let mut f = form();
        f.stock = Some("4294967296".to_string());
        let errors = f.validate().unwrap_err();
        assert_eq!(
            errors.get("stock").unwrap(),
            ["The stock field must not be greater than 4294967295."]
        );
    }

    #[test]
    fn image_must_be_an_image_within_size_limit() {
        let mut f = form();
        f.image = Some(UploadedImage {
            file_name: Some("notes.pdf".to_string()),
            content_type: Some("application/pdf".to_string()),
            bytes: vec![1, 2, 3],
        });
        let errors = f.validate().unwrap_err();
        assert_eq!(errors.get("image").unwrap(), ["The image field must be an image."]);

        let mut f = form();
        f.image = Some(png(IMAGE_MAX_KILOBYTES * 1024 + 1));
        let errors = f.validate().unwrap_err();
        assert_eq!(
            errors.get("image").unwrap(),
            ["The image field must not be greater than 2048 kilobytes."]
        );

        let mut f = form();
        f.image = Some(png(IMAGE_MAX_KILOBYTES * 1024));
        assert!(f.validate().unwrap().image.is_some());
    }

    #[test]
    fn empty_upload_counts_as_no_image() {
        let mut f = form();
        f.image = Some(png(0));
        assert!(f.validate().unwrap().image.is_none());
    }

    #[test]
    fn image_type_falls_back_to_extension_for_octet_stream() {
        let img = UploadedImage {
            file_name: Some("photo.JPEG".to_string()),
            content_type: Some("application/octet-stream".to_string()),
            bytes: vec![0xFF, 0xD8, 0xFF, 0xE0],
        };
        assert_eq!(img.image_type(), Some(ImageType::Jpeg));
    }

    #[test]
    fn text_declared_as_png_is_not_an_image() {
        let mut f = form();
        f.image = Some(UploadedImage {
            file_name: Some("cola.png".to_string()),
            content_type: Some("image/png".to_string()),
            bytes: b"#!/bin/sh\necho not an image\n".to_vec(),
        });
        let errors = f.validate().unwrap_err();
        assert_eq!(errors.get("image").unwrap(), ["The image field must be an image."]);
    }

    #[test]
    fn svg_uploads_are_refused() {
        let mut f = form();
        f.image = Some(UploadedImage {
            file_name: Some("logo.svg".to_string()),
            content_type: Some("image/svg+xml".to_string()),
            bytes: b"<svg xmlns=\"http://www.w3.org/2000/svg\"><script>alert(1)</script></svg>"
                .to_vec(),
        });
        let errors = f.validate().unwrap_err();
        assert_eq!(errors.get("image").unwrap(), ["The image field must be an image."]);
        assert_eq!(ImageType::from_extension("svg"), None);
    }

    #[test]
    fn declared_type_must_match_contents() {
        let gif_as_png = UploadedImage {
            file_name: Some("cola.png".to_string()),
            content_type: Some("image/png".to_string()),
            bytes: b"GIF89a\x01\x00".to_vec(),
        };
        assert_eq!(gif_as_png.image_type(), None);

        let webp = UploadedImage {
            file_name: Some("cola.webp".to_string()),
            content_type: Some("image/webp".to_string()),
            bytes: b"RIFF\x24\x00\x00\x00WEBPVP8 ".to_vec(),
        };
        assert_eq!(webp.image_type(), Some(ImageType::Webp));
        assert_eq!(ImageType::sniff(b"BM\x36\x00"), Some(ImageType::Bmp));
    }

    #[test]
    fn product_reports_derived_stock_status() {
        let now = Utc::now();
        let product = Product {
            id: ProductId::new(1),
            name: "Oreo Cookies".to_string(),
            price: 3.0,
            description: None,
            stock: 5,
            low_stock_threshold: 5,
            image_path: None,
            category_id: None,
            created_at: now,
            updated_at: now,
        };
        assert_eq!(product.stock_status(), StockStatus::LowStock);
        assert_eq!(product.id(), ProductId::new(1));
    }
}
