use anyhow::Context;
use axum::extract::Multipart;
use bytes::Bytes;
use uuid::Uuid;

use crate::error::ApiError;
use crate::products::repo_types::Product;
use crate::state::AppState;

pub const MAX_IMAGES: usize = 5;
pub const MAX_IMAGE_BYTES: usize = 2 * 1024 * 1024;

pub struct NewImage {
    pub bytes: Bytes,
    pub content_type: String,
}

/// Listing form as submitted, text fields unparsed.
#[derive(Default)]
pub struct ListingForm {
    pub title: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<String>,
    pub is_free: Option<String>,
    pub category: Option<String>,
    pub condition: Option<String>,
    pub location: Option<String>,
    pub existing_images: Option<String>,
    pub images: Vec<NewImage>,
}

impl ListingForm {
    /// Older frontend builds send the title under `name`; `title` wins
    /// when both are present and non-empty.
    pub fn effective_title(&self) -> Option<&str> {
        non_empty(&self.title).or_else(|| non_empty(&self.name))
    }
}

pub fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

pub async fn read_listing_form(mp: &mut Multipart) -> Result<ListingForm, ApiError> {
    let mut form = ListingForm::default();
    while let Ok(Some(field)) = mp.next_field().await {
        let name = field.name().map(|s| s.to_string());
        match name.as_deref() {
            Some("images") | Some("images[]") => {
                let content_type = field
                    .content_type()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "application/octet-stream".into());
                if !content_type.starts_with("image/") {
                    return Err(ApiError::Validation(
                        "Only image files (jpg, png, webp) are allowed!".into(),
                    ));
                }
                let data = field.bytes().await.map_err(malformed)?;
                if data.len() > MAX_IMAGE_BYTES {
                    return Err(ApiError::Validation("File too large".into()));
                }
                if form.images.len() == MAX_IMAGES {
                    return Err(ApiError::Validation(
                        "Cannot upload more than 5 images".into(),
                    ));
                }
                form.images.push(NewImage {
                    bytes: data,
                    content_type,
                });
            }
            Some("title") => form.title = Some(field.text().await.map_err(malformed)?),
            Some("name") => form.name = Some(field.text().await.map_err(malformed)?),
            Some("description") => form.description = Some(field.text().await.map_err(malformed)?),
            Some("price") => form.price = Some(field.text().await.map_err(malformed)?),
            Some("isFree") => form.is_free = Some(field.text().await.map_err(malformed)?),
            Some("category") => form.category = Some(field.text().await.map_err(malformed)?),
            Some("condition") => form.condition = Some(field.text().await.map_err(malformed)?),
            Some("location") => form.location = Some(field.text().await.map_err(malformed)?),
            Some("existingImages") => {
                form.existing_images = Some(field.text().await.map_err(malformed)?)
            }
            _ => {}
        }
    }
    Ok(form)
}

fn malformed(_: axum::extract::multipart::MultipartError) -> ApiError {
    ApiError::Validation("Malformed multipart body".into())
}

pub async fn upload_images(
    st: &AppState,
    seller_id: Uuid,
    images: Vec<NewImage>,
) -> anyhow::Result<Vec<String>> {
    let mut urls = Vec::with_capacity(images.len());
    for img in images {
        let ext = ext_from_mime(&img.content_type).unwrap_or("bin");
        let key = format!("listings/{}/{}.{}", seller_id, Uuid::new_v4(), ext);
        let url = st
            .storage
            .put_object(&key, img.bytes, &img.content_type)
            .await
            .with_context(|| format!("put_object {}", key))?;
        urls.push(url);
    }
    Ok(urls)
}

fn ext_from_mime(ct: &str) -> Option<&'static str> {
    match ct {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/webp" => Some("webp"),
        "image/heic" => Some("heic"),
        _ => None,
    }
}

/// Kept images come as a JSON array of URLs in `existingImages`. A missing
/// field keeps everything; an unparsable one falls back to the current set.
/// New uploads append, capped at five.
pub fn merge_images(
    existing: Option<&str>,
    current: &[String],
    uploaded: Vec<String>,
) -> Vec<String> {
    let mut kept: Vec<String> = match existing {
        Some(raw) => serde_json::from_str(raw).unwrap_or_else(|_| current.to_vec()),
        None => current.to_vec(),
    };
    kept.extend(uploaded);
    kept.truncate(MAX_IMAGES);
    kept
}

/// Price for a new listing. Free forces zero no matter what was typed;
/// paid listings need a positive finite number.
pub fn resolve_price(is_free: bool, raw: Option<&str>) -> Result<f64, ApiError> {
    if is_free {
        return Ok(0.0);
    }
    let price = raw
        .map(str::trim)
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|p| p.is_finite())
        .unwrap_or(0.0);
    if price < 0.0 {
        return Err(ApiError::Validation("Price cannot be negative".into()));
    }
    if price == 0.0 {
        return Err(ApiError::Validation("Price is required for paid items".into()));
    }
    Ok(price)
}

/// Price rules for edits: flipping to free zeroes the price, a submitted
/// price only applies to paid listings, and the final state must be
/// consistent.
pub fn apply_price_update(
    product: &mut Product,
    is_free_raw: Option<&str>,
    price_raw: Option<&str>,
) -> Result<(), ApiError> {
    if let Some(raw) = is_free_raw {
        product.is_free = raw == "true";
        if product.is_free {
            product.price = 0.0;
        }
    }
    if !product.is_free {
        if let Some(raw) = price_raw {
            match raw.trim().parse::<f64>() {
                Ok(p) if p.is_finite() && p < 0.0 => {
                    return Err(ApiError::Validation("Invalid price".into()))
                }
                Ok(p) if p.is_finite() => product.price = p,
                _ => product.price = 0.0,
            }
        }
        if product.price <= 0.0 {
            return Err(ApiError::Validation("Price is required for paid items".into()));
        }
    }
    Ok(())
}

pub fn validate_title(title: &str) -> Result<(), ApiError> {
    let len = title.chars().count();
    if len < 3 {
        return Err(ApiError::Validation("Title must be at least 3 characters".into()));
    }
    if len > 100 {
        return Err(ApiError::Validation("Title cannot exceed 100 characters".into()));
    }
    Ok(())
}

pub fn validate_description(description: &str) -> Result<(), ApiError> {
    let len = description.chars().count();
    if len < 10 {
        return Err(ApiError::Validation(
            "Description must be at least 10 characters".into(),
        ));
    }
    if len > 2000 {
        return Err(ApiError::Validation(
            "Description cannot exceed 2000 characters".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::products::repo_types::{Category, Condition, ListingStatus};
    use time::OffsetDateTime;

    fn listing(price: f64, is_free: bool) -> Product {
        Product {
            id: Uuid::new_v4(),
            seller_id: Uuid::new_v4(),
            title: "Desk lamp".into(),
            description: "Warm light, lightly used".into(),
            price,
            is_free,
            category: Category::Furniture,
            condition: Condition::Used,
            location: "North dorms".into(),
            images: vec!["https://img.local/a.jpg".into()],
            status: ListingStatus::Active,
            created_at: OffsetDateTime::now_utc(),
            updated_at: OffsetDateTime::now_utc(),
        }
    }

    #[test]
    fn test_ext_from_mime() {
        assert_eq!(ext_from_mime("image/jpeg"), Some("jpg"));
        assert_eq!(ext_from_mime("image/jpg"), Some("jpg"));
        assert_eq!(ext_from_mime("image/png"), Some("png"));
        assert_eq!(ext_from_mime("image/webp"), Some("webp"));
        assert_eq!(ext_from_mime("image/heic"), Some("heic"));
        assert_eq!(ext_from_mime("application/octet-stream"), None);
    }

    #[test]
    fn title_falls_back_to_name_field() {
        let mut form = ListingForm::default();
        form.name = Some("Desk lamp".into());
        assert_eq!(form.effective_title(), Some("Desk lamp"));

        form.title = Some("Better lamp".into());
        assert_eq!(form.effective_title(), Some("Better lamp"));

        form.title = Some("".into());
        assert_eq!(form.effective_title(), Some("Desk lamp"));
    }

    #[test]
    fn merge_keeps_all_when_field_absent() {
        let current = vec!["a".to_string(), "b".to_string()];
        let merged = merge_images(None, &current, vec!["c".into()]);
        assert_eq!(merged, vec!["a", "b", "c"]);
    }

    #[test]
    fn merge_honors_kept_subset() {
        let current = vec!["a".to_string(), "b".to_string()];
        let merged = merge_images(Some(r#"["b"]"#), &current, vec!["c".into()]);
        assert_eq!(merged, vec!["b", "c"]);
    }

    #[test]
    fn merge_falls_back_on_bad_json() {
        let current = vec!["a".to_string()];
        let merged = merge_images(Some("not json"), &current, vec![]);
        assert_eq!(merged, vec!["a"]);
    }

    #[test]
    fn merge_caps_at_five() {
        let current: Vec<String> = (0..4).map(|i| format!("img{i}")).collect();
        let merged = merge_images(None, &current, vec!["x".into(), "y".into()]);
        assert_eq!(merged.len(), MAX_IMAGES);
        assert_eq!(merged[4], "x");
    }

    #[test]
    fn free_listing_price_is_zero() {
        assert_eq!(resolve_price(true, Some("499")).unwrap(), 0.0);
        assert_eq!(resolve_price(true, None).unwrap(), 0.0);
    }

    #[test]
    fn paid_listing_needs_positive_price() {
        assert_eq!(resolve_price(false, Some("120.5")).unwrap(), 120.5);

        let missing = resolve_price(false, None).unwrap_err();
        assert!(matches!(missing, ApiError::Validation(ref m) if m == "Price is required for paid items"));

        let zero = resolve_price(false, Some("0")).unwrap_err();
        assert!(matches!(zero, ApiError::Validation(ref m) if m == "Price is required for paid items"));

        let garbage = resolve_price(false, Some("cheap")).unwrap_err();
        assert!(matches!(garbage, ApiError::Validation(ref m) if m == "Price is required for paid items"));

        let negative = resolve_price(false, Some("-5")).unwrap_err();
        assert!(matches!(negative, ApiError::Validation(ref m) if m == "Price cannot be negative"));
    }

    #[test]
    fn update_flipping_to_free_zeroes_price() {
        let mut product = listing(250.0, false);
        apply_price_update(&mut product, Some("true"), Some("999")).unwrap();
        assert!(product.is_free);
        assert_eq!(product.price, 0.0);
    }

    #[test]
    fn update_rejects_negative_price() {
        let mut product = listing(250.0, false);
        let err = apply_price_update(&mut product, None, Some("-10")).unwrap_err();
        assert!(matches!(err, ApiError::Validation(ref m) if m == "Invalid price"));
    }

    #[test]
    fn update_flipping_to_paid_requires_price() {
        let mut product = listing(0.0, true);
        let err = apply_price_update(&mut product, Some("false"), None).unwrap_err();
        assert!(matches!(err, ApiError::Validation(ref m) if m == "Price is required for paid items"));

        let mut product = listing(0.0, true);
        apply_price_update(&mut product, Some("false"), Some("45")).unwrap();
        assert!(!product.is_free);
        assert_eq!(product.price, 45.0);
    }

    #[test]
    fn title_and_description_bounds() {
        assert!(validate_title("ab").is_err());
        assert!(validate_title("abc").is_ok());
        assert!(validate_title(&"x".repeat(101)).is_err());
        assert!(validate_description("too short").is_err());
        assert!(validate_description("long enough text").is_ok());
        assert!(validate_description(&"y".repeat(2001)).is_err());
    }
}
