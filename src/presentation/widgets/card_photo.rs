//! Photo state for profile card rendering.

use std::sync::Arc;

use ratatui_image::picker::{Picker, ProtocolType};
use ratatui_image::protocol::StatefulProtocol;

use crate::domain::entities::{ImageId, ImageStatus, Person};

/// One photo of a person, tracked through the loading pipeline and holding
/// the terminal graphics protocol once decoded.
pub struct CardPhoto {
    /// Cache identifier.
    pub id: ImageId,
    /// Source URL.
    pub url: String,
    /// Decoded image, if loaded.
    pub image: Option<Arc<image::DynamicImage>>,
    /// Terminal rendering protocol, built lazily from the image.
    pub protocol: Option<StatefulProtocol>,
    /// Pipeline status.
    pub status: ImageStatus,
}

impl CardPhoto {
    #[must_use]
    pub fn new(id: ImageId, url: String) -> Self {
        Self {
            id,
            url,
            image: None,
            protocol: None,
            status: ImageStatus::NotStarted,
        }
    }

    /// Builds the photo state for one of a person's pictures.
    #[must_use]
    pub fn for_person(person: &Person, index: usize) -> Option<Self> {
        let url = person.pictures().get(index)?;
        Some(Self::new(ImageId::from_url(url), url.clone()))
    }

    pub fn set_loaded(&mut self, image: Arc<image::DynamicImage>) {
        self.image = Some(image);
        self.status = ImageStatus::Ready;
        self.protocol = None;
    }

    pub fn set_downloading(&mut self) {
        self.status = ImageStatus::Downloading;
    }

    pub fn set_failed(&mut self, error: String) {
        self.status = ImageStatus::Failed(error);
    }

    #[must_use]
    pub const fn is_ready(&self) -> bool {
        self.image.is_some() && self.status.is_ready()
    }

    #[must_use]
    pub const fn needs_load(&self) -> bool {
        self.status.is_not_started()
    }

    /// Builds the graphics protocol if the image is decoded but no protocol
    /// exists yet. Cheap no-op otherwise.
    pub fn update_protocol_if_needed(&mut self, picker: &Picker) {
        if self.protocol.is_some() {
            return;
        }

        if let Some(ref image) = self.image {
            self.protocol = Some(picker.new_resize_protocol((**image).clone()));
        }
    }

    pub fn clear_protocol(&mut self) {
        self.protocol = None;
    }
}

impl std::fmt::Debug for CardPhoto {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CardPhoto")
            .field("id", &self.id)
            .field("url", &self.url)
            .field("has_image", &self.image.is_some())
            .field("has_protocol", &self.protocol.is_some())
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

/// Detects the best terminal graphics protocol once per session.
pub struct PhotoPicker {
    picker: Picker,
}

impl PhotoPicker {
    #[must_use]
    pub fn new() -> Self {
        let mut picker = Picker::from_query_stdio().unwrap_or_else(|_| Picker::halfblocks());

        let caps = picker.capabilities();
        let has_sixel = caps
            .iter()
            .any(|c| matches!(c, ratatui_image::picker::Capability::Sixel));
        let has_kitty = caps
            .iter()
            .any(|c| matches!(c, ratatui_image::picker::Capability::Kitty));

        if has_sixel && !has_kitty && picker.protocol_type() == ProtocolType::Halfblocks {
            picker.set_protocol_type(ProtocolType::Sixel);
        }

        Self { picker }
    }

    /// Picker that always renders with half-block characters.
    #[must_use]
    pub fn halfblocks() -> Self {
        Self {
            picker: Picker::halfblocks(),
        }
    }

    #[must_use]
    pub const fn picker(&self) -> &Picker {
        &self.picker
    }
}

impl Default for PhotoPicker {
    fn default() -> Self {
        Self::new()
    }
}
