//! Recent campus activities and the photo gallery that showcases them.

use std::time::Duration;

use serde::Serialize;

/// Delay before the gallery moves on to the next photo by itself.
pub const AUTO_ADVANCE_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GalleryImage {
    pub src: &'static str,
    pub alt: &'static str,
    pub caption: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct TournamentPage {
    pub title: &'static str,
    pub date: &'static str,
    pub location: &'static str,
    pub participants: &'static str,
    pub description: &'static str,
    pub images: Vec<GalleryImage>,
    pub highlights: Vec<&'static str>,
    pub whats_next: Vec<&'static str>,
    pub upcoming: &'static str,
}

impl TournamentPage {
    pub fn volleyball() -> Self {
        Self {
            title: "IT Park Volleyball Championship 2024",
            date: "September 06-07, 2025",
            location: "IT Park Sports Complex",
            participants: "16 Teams",
            description: "An exciting volleyball tournament that brought together teams from across the IT Park community for two days of competitive sports and team building.",
            images: vec![
                GalleryImage {
                    src: "/assets/activities/opening-ceremony.png",
                    alt: "Tournament Opening Ceremony",
                    caption: "Grand Opening Ceremony",
                },
                GalleryImage {
                    src: "/assets/activities/match-action.png",
                    alt: "Intense Match Action",
                    caption: "Intense Match Moments",
                },
                GalleryImage {
                    src: "/assets/activities/celebrations.png",
                    alt: "Team Celebrations",
                    caption: "Victory Celebrations",
                },
                GalleryImage {
                    src: "/assets/activities/award-ceremony.png",
                    alt: "Award Ceremony",
                    caption: "Award Ceremony",
                },
                GalleryImage {
                    src: "/assets/activities/champions.png",
                    alt: "Winners Group Photo",
                    caption: "Champions Group Photo",
                },
            ],
            highlights: vec![
                "16 competitive teams participated",
                "Two days of exciting matches",
                "Great team building and networking",
                "Enhanced community spirit",
            ],
            whats_next: vec![
                "This volleyball tournament is just the beginning! IT Park is committed to organizing more exciting activities and events that bring our community together.",
                "Stay tuned for upcoming events including cricket tournaments, cultural festivals, tech meetups, and more recreational activities.",
            ],
            upcoming: "Join us for upcoming tournaments, cultural events, tech talks, and community activities. IT Park - where innovation meets recreation!",
        }
    }

    pub fn gallery(&self) -> Gallery {
        Gallery::new(self.images.len())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GalleryError {
    #[error("image {index} is out of range for a gallery of {len}")]
    OutOfRange { index: usize, len: usize },
    #[error("gallery has no images")]
    Empty,
}

/// Cursor over a fixed set of images. Navigation wraps in both directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Gallery {
    active_index: usize,
    len: usize,
}

impl Gallery {
    pub fn new(len: usize) -> Self {
        Self {
            active_index: 0,
            len,
        }
    }

    /// Gallery positioned at `index`, as requested through a `?image=` link.
    pub fn at(len: usize, index: usize) -> Result<Self, GalleryError> {
        let mut gallery = Self::new(len);
        gallery.select(index)?;
        Ok(gallery)
    }

    pub fn active_index(&self) -> usize {
        self.active_index
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn next(&mut self) -> usize {
        if self.len > 0 {
            self.active_index = (self.active_index + 1) % self.len;
        }
        self.active_index
    }

    pub fn prev(&mut self) -> usize {
        if self.len > 0 {
            self.active_index = (self.active_index + self.len - 1) % self.len;
        }
        self.active_index
    }

    pub fn select(&mut self, index: usize) -> Result<usize, GalleryError> {
        if self.len == 0 {
            return Err(GalleryError::Empty);
        }
        if index >= self.len {
            return Err(GalleryError::OutOfRange {
                index,
                len: self.len,
            });
        }
        self.active_index = index;
        Ok(index)
    }

    pub fn next_index(&self) -> usize {
        let mut probe = *self;
        probe.next()
    }

    pub fn prev_index(&self) -> usize {
        let mut probe = *self;
        probe.prev()
    }
}
