//! Card kinds and the asset catalog that supplies their shared back images.
//!
//! Each card kind knows where its own faces come from; the composer only ever
//! sees the resulting [`CardImagePair`]s.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::compose::CardImagePair;
use crate::error::{Error, Face, Result};

/// What a resource card produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    WhiteLotus,
    Water,
    Earth,
    Fire,
    Air,
    Avatar,
}

impl ResourceType {
    pub const ALL: [ResourceType; 6] = [
        ResourceType::WhiteLotus,
        ResourceType::Water,
        ResourceType::Earth,
        ResourceType::Fire,
        ResourceType::Air,
        ResourceType::Avatar,
    ];
}

/// Shared back designs looked up in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackKind {
    Resource,
    Vip,
}

/// Immutable lookup from back design to image file. Built once by the caller
/// and passed by reference wherever backs are resolved.
#[derive(Debug, Clone, Default)]
pub struct AssetCatalog {
    backs: HashMap<BackKind, PathBuf>,
}

impl AssetCatalog {
    pub fn builder() -> AssetCatalogBuilder {
        AssetCatalogBuilder::default()
    }

    pub fn back(&self, kind: BackKind) -> Option<&Path> {
        self.backs.get(&kind).map(PathBuf::as_path)
    }
}

#[derive(Debug, Default)]
pub struct AssetCatalogBuilder {
    backs: HashMap<BackKind, PathBuf>,
}

impl AssetCatalogBuilder {
    pub fn back(mut self, kind: BackKind, path: impl Into<PathBuf>) -> Self {
        self.backs.insert(kind, path.into());
        self
    }

    pub fn build(self) -> AssetCatalog {
        AssetCatalog { backs: self.backs }
    }
}

/// Where a card's back image comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackImage<'a> {
    /// Single-sided card.
    None,
    Path(&'a Path),
    /// The card needs a back the catalog does not have.
    Unavailable(BackKind),
}

/// The two capabilities the composer needs from any card.
pub trait CardFaces {
    fn front_image(&self) -> Option<&Path>;
    fn back_image<'a>(&'a self, catalog: &'a AssetCatalog) -> BackImage<'a>;
}

/// Every card kind the tool prints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Card {
    /// Fully specified front and optional back.
    Plain {
        front: PathBuf,
        #[serde(default)]
        back: Option<PathBuf>,
    },
    /// Resource card; shares the catalog's resource back. `produces` does
    /// not affect layout; it is reported in the deck summary.
    Resource {
        #[serde(default)]
        front: Option<PathBuf>,
        produces: ResourceType,
    },
    /// VIP card; shares the catalog's VIP back.
    Vip {
        #[serde(default)]
        front: Option<PathBuf>,
    },
    /// Tokens are printed on one side only.
    Token { front: PathBuf },
}

impl Card {
    /// What a resource card produces; `None` for every other kind.
    pub fn produces(&self) -> Option<ResourceType> {
        match self {
            Card::Resource { produces, .. } => Some(*produces),
            _ => None,
        }
    }

    /// Resolve relative image paths against `base`.
    pub fn rebase(&mut self, base: &Path) {
        let join = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        match self {
            Card::Plain { front, back } => {
                join(front);
                if let Some(back) = back {
                    join(back);
                }
            }
            Card::Resource { front, .. } | Card::Vip { front } => {
                if let Some(front) = front {
                    join(front);
                }
            }
            Card::Token { front } => join(front),
        }
    }
}

impl CardFaces for Card {
    fn front_image(&self) -> Option<&Path> {
        match self {
            Card::Plain { front, .. } | Card::Token { front } => Some(front),
            Card::Resource { front, .. } | Card::Vip { front } => front.as_deref(),
        }
    }

    fn back_image<'a>(&'a self, catalog: &'a AssetCatalog) -> BackImage<'a> {
        let shared = move |kind: BackKind| match catalog.back(kind) {
            Some(path) => BackImage::Path(path),
            None => BackImage::Unavailable(kind),
        };
        match self {
            Card::Plain { back, .. } => back.as_deref().map_or(BackImage::None, BackImage::Path),
            Card::Resource { .. } => shared(BackKind::Resource),
            Card::Vip { .. } => shared(BackKind::Vip),
            Card::Token { .. } => BackImage::None,
        }
    }
}

/// Turn cards into the image pairs the composer consumes, in order.
///
/// A card whose front is missing, or whose back design is absent from the
/// catalog, is reported as a missing asset for that card index.
pub fn collect_pairs<C: CardFaces>(cards: &[C], catalog: &AssetCatalog) -> Result<Vec<CardImagePair>> {
    cards
        .iter()
        .enumerate()
        .map(|(index, card)| {
            let front = card
                .front_image()
                .ok_or_else(|| Error::missing(index, Face::Front, "no front image available"))?;
            let back = match card.back_image(catalog) {
                BackImage::None => None,
                BackImage::Path(path) => Some(path.to_path_buf()),
                BackImage::Unavailable(kind) => {
                    return Err(Error::missing(
                        index,
                        Face::Back,
                        format!("catalog has no {kind:?} back image"),
                    ))
                }
            };
            Ok(CardImagePair::new(front, back))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> AssetCatalog {
        AssetCatalog::builder()
            .back(BackKind::Resource, "backs/resource.png")
            .back(BackKind::Vip, "backs/vip.png")
            .build()
    }

    #[test]
    fn kinds_resolve_their_backs() {
        let cards = vec![
            Card::Resource {
                front: Some("fire_1.png".into()),
                produces: ResourceType::Fire,
            },
            Card::Vip {
                front: Some("vip_1.png".into()),
            },
            Card::Token {
                front: "token.png".into(),
            },
            Card::Plain {
                front: "custom.png".into(),
                back: Some("custom_back.png".into()),
            },
        ];
        let pairs = collect_pairs(&cards, &catalog()).unwrap();
        assert_eq!(
            pairs,
            vec![
                CardImagePair::double_sided("fire_1.png", "backs/resource.png"),
                CardImagePair::double_sided("vip_1.png", "backs/vip.png"),
                CardImagePair::single_sided("token.png"),
                CardImagePair::double_sided("custom.png", "custom_back.png"),
            ]
        );
    }

    #[test]
    fn only_resource_cards_produce() {
        let resource = Card::Resource {
            front: None,
            produces: ResourceType::Air,
        };
        let token = Card::Token {
            front: "t.png".into(),
        };
        assert_eq!(resource.produces(), Some(ResourceType::Air));
        assert_eq!(token.produces(), None);
    }

    #[test]
    fn uncatalogued_back_is_missing() {
        let catalog = AssetCatalog::builder()
            .back(BackKind::Resource, "r.png")
            .build();
        let cards = vec![
            Card::Token { front: "t.png".into() },
            Card::Vip {
                front: Some("v.png".into()),
            },
        ];
        let err = collect_pairs(&cards, &catalog).unwrap_err();
        assert!(matches!(
            err,
            Error::MissingAsset {
                index: 1,
                face: Face::Back,
                ..
            }
        ));
    }

    #[test]
    fn exhausted_front_is_missing() {
        let cards = vec![Card::Resource {
            front: None,
            produces: ResourceType::Water,
        }];
        let err = collect_pairs(&cards, &catalog()).unwrap_err();
        assert!(matches!(
            err,
            Error::MissingAsset {
                index: 0,
                face: Face::Front,
                ..
            }
        ));
    }

    #[test]
    fn rebase_only_touches_relative_paths() {
        let mut card = Card::Plain {
            front: "a.png".into(),
            back: Some("/abs/b.png".into()),
        };
        card.rebase(Path::new("/deck"));
        assert_eq!(
            card,
            Card::Plain {
                front: "/deck/a.png".into(),
                back: Some("/abs/b.png".into()),
            }
        );
    }

    #[test]
    fn cards_deserialize_by_kind() {
        let cards: Vec<Card> = serde_json::from_str(
            r#"[
                {"kind": "resource", "front": "f.png", "produces": "white_lotus"},
                {"kind": "token", "front": "t.png"},
                {"kind": "plain", "front": "p.png"}
            ]"#,
        )
        .unwrap();
        assert_eq!(
            cards[0],
            Card::Resource {
                front: Some("f.png".into()),
                produces: ResourceType::WhiteLotus,
            }
        );
        assert_eq!(
            cards[2],
            Card::Plain {
                front: "p.png".into(),
                back: None,
            }
        );
    }
}
