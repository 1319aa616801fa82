use crate::error::FieldErrors;

/// Maximum mood length, in characters.
pub const MAX_TEXT_CHARS: usize = 500;

/// Maximum accepted image size (4 MiB).
pub const MAX_IMAGE_BYTES: usize = 4 * 1024 * 1024;

/// Raw submission fields, as received from the form.
#[derive(Debug, Clone, Default)]
pub struct SubmitPost {
    pub text: String,
    /// Comma-joined hashtags in selection order.
    pub hashtags: Option<String>,
    pub image: Option<ImageUpload>,
}

/// An uploaded image file.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    /// File name as supplied by the client.
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

impl SubmitPost {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn with_hashtags(mut self, hashtags: impl Into<String>) -> Self {
        self.hashtags = Some(hashtags.into());
        self
    }

    pub fn with_image(mut self, image: ImageUpload) -> Self {
        self.image = Some(image);
        self
    }

    /// The attached image, ignoring empty file parts.
    pub fn attached_image(&self) -> Option<&ImageUpload> {
        self.image.as_ref().filter(|image| image.size() > 0)
    }

    /// Check every field constraint, collecting all failures.
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::default();

        let chars = self.text.chars().count();
        if chars == 0 {
            errors.add("text", "Mood cannot be empty.");
        } else if chars > MAX_TEXT_CHARS {
            errors.add("text", "Mood is too long.");
        }

        if let Some(image) = self.attached_image() {
            if image.size() > MAX_IMAGE_BYTES {
                errors.add("image", "Image size must be less than 4MB.");
            }
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Split a comma-joined hashtag string, dropping blank segments.
pub fn derive_hashtags(raw: Option<&str>) -> Vec<String> {
    raw.map(|raw| {
        raw.split(',')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .map(String::from)
            .collect()
    })
    .unwrap_or_default()
}
