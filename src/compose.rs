//! Render Composer - SVG Assembly From Decoded Parts
//!
//! Composition is read-only: the composer borrows the registry and walks
//! the public, visibility-respecting path. Part bodies go through the
//! path codec; every attribute value goes through the validator's
//! embedding sanitizer before landing inside a quoted attribute.

use crate::codec;
use crate::error::Result;
use crate::registry::{AssetId, AssetRegistry};
use crate::validation::Validator;

/// Assembles registered assets into drawable SVG text.
pub struct RenderComposer<'a> {
    registry: &'a AssetRegistry,
    validator: &'a dyn Validator,
}

impl<'a> RenderComposer<'a> {
    pub fn new(registry: &'a AssetRegistry, validator: &'a dyn Validator) -> Self {
        Self {
            registry,
            validator,
        }
    }

    /// Drawable `<g>` fragment for one asset: one `<path>` per part, in
    /// registration z-order. A part carries `fill` only when it has a
    /// color; otherwise the path inherits the document default. Disabled
    /// assets are reported exactly like missing ones.
    pub fn compose_part(&self, id: AssetId) -> Result<String> {
        let asset = self.registry.visible_asset(id)?;
        let desc = self.registry.describe(id)?;

        let mut out = format!(r#"<g id="asset-{}" desc="{}">"#, id, self.embed(&desc));
        for &part_id in &asset.parts {
            let part = self.registry.part(part_id)?;
            let d = codec::decode(&part.body)?;
            match &part.color {
                Some(color) => out.push_str(&format!(
                    r#"<path fill="{}" d="{}"/>"#,
                    self.embed(color),
                    d
                )),
                None => out.push_str(&format!(r#"<path d="{}"/>"#, d)),
            }
        }
        out.push_str("</g>");

        Ok(out)
    }

    /// Full SVG document, sized to the asset's declared width and height.
    pub fn compose_document(&self, id: AssetId) -> Result<String> {
        let asset = self.registry.visible_asset(id)?;
        Ok(format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {} {}">{}</svg>"#,
            asset.width,
            asset.height,
            self.compose_part(id)?
        ))
    }

    fn embed(&self, text: &str) -> String {
        String::from_utf8_lossy(&self.validator.sanitize_for_embedding(text)).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RegistryError;
    use crate::registry::{AssetDefinition, PartDefinition};
    use crate::validation::CharsetValidator;

    fn seeded_registry() -> AssetRegistry {
        let mut registry = AssetRegistry::new();
        registry.allow_list_mut().set_open(true);
        registry
            .register(
                &AssetDefinition {
                    group: "icons".to_string(),
                    category: "tools".to_string(),
                    name: "hammer".to_string(),
                    width: 48,
                    height: 32,
                    minter: "studio".to_string(),
                    soulbound: None,
                    parts: vec![
                        PartDefinition {
                            body: vec![0x4D, 0x10, 0x18, 0x4C, 0x00, 0x00],
                            color: Some("#102030".to_string()),
                        },
                        PartDefinition {
                            body: vec![0x6D, 0x00, 0x7A, 0x00, 0x00, 0x00],
                            color: None,
                        },
                    ],
                },
                "s1",
                &CharsetValidator,
            )
            .unwrap();
        registry
    }

    #[test]
    fn fragment_lists_parts_in_z_order() {
        let registry = seeded_registry();
        let composer = RenderComposer::new(&registry, &CharsetValidator);

        let fragment = composer.compose_part(1).unwrap();
        assert_eq!(
            fragment,
            r##"<g id="asset-1" desc="icons/tools/hammer"><path fill="#102030" d="M-1000 L"/><path d="mz"/></g>"##
        );
    }

    #[test]
    fn document_is_sized_to_the_asset() {
        let registry = seeded_registry();
        let composer = RenderComposer::new(&registry, &CharsetValidator);

        let document = composer.compose_document(1).unwrap();
        assert!(document.starts_with(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 48 32">"#
        ));
        assert!(document.ends_with("</g></svg>"));
    }

    #[test]
    fn missing_asset_is_not_found() {
        let registry = AssetRegistry::new();
        let composer = RenderComposer::new(&registry, &CharsetValidator);
        assert!(matches!(
            composer.compose_part(1),
            Err(RegistryError::NotFound(_))
        ));
    }

    #[test]
    fn disabled_asset_is_not_found_on_the_public_path() {
        let mut registry = seeded_registry();
        registry.set_disabled(1, true).unwrap();

        let composer = RenderComposer::new(&registry, &CharsetValidator);
        assert!(matches!(
            composer.compose_document(1),
            Err(RegistryError::NotFound(_))
        ));
    }
}
