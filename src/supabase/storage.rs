use super::SupabaseClient;
use crate::mapper::ImageLocator;

/// Object locator over the hosted storage service. Public URLs are composed
/// client-side; the object's existence is never verified.
pub struct SupabaseStorage {
    base_url: String,
    bucket: String,
}

impl SupabaseStorage {
    pub fn new(base_url: &str, bucket: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            bucket: bucket.to_string(),
        }
    }
}

impl SupabaseClient {
    pub fn storage(&self) -> SupabaseStorage {
        SupabaseStorage::new(&self.base_url, &self.storage_bucket)
    }
}

impl ImageLocator for SupabaseStorage {
    fn public_url(&self, path: &str) -> Option<String> {
        if self.base_url.is_empty() || self.bucket.is_empty() {
            return None;
        }
        Some(format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url, self.bucket, path
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_url_composition() {
        let storage = SupabaseStorage::new("https://proj.supabase.co/", "alert-images");
        assert_eq!(
            storage.public_url("verified_alerts/images/abc123.jpg").as_deref(),
            Some(
                "https://proj.supabase.co/storage/v1/object/public/alert-images/verified_alerts/images/abc123.jpg"
            )
        );
    }

    #[test]
    fn test_unconfigured_storage_resolves_nothing() {
        let storage = SupabaseStorage::new("", "alert-images");
        assert_eq!(storage.public_url("verified_alerts/images/abc123.jpg"), None);
    }
}
