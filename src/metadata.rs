//! Token Metadata - Downstream JSON Assembly
//!
//! Consumes only the registry's public query surface plus the composer.
//! The rendered document travels inline as a base64 SVG data URI, so the
//! payload is self-contained. String escaping is the serializer's job.

use serde_json::json;

use crate::compose::RenderComposer;
use crate::error::Result;
use crate::registry::{AssetId, AssetRegistry};

/// Token metadata JSON for one asset. Public path only: a disabled asset
/// yields the same NotFound the render path does.
pub fn token_metadata(
    registry: &AssetRegistry,
    composer: &RenderComposer<'_>,
    id: AssetId,
) -> Result<String> {
    let asset = registry.visible_asset(id)?;
    let document = composer.compose_document(id)?;

    let mut attributes = vec![
        json!({ "trait_type": "group", "value": registry.group_name(asset.group)? }),
        json!({
            "trait_type": "category",
            "value": registry.category_name(asset.group, asset.category)?,
        }),
        json!({ "trait_type": "minter", "value": asset.minter }),
    ];
    if let Some(soulbound) = &asset.soulbound {
        attributes.push(json!({ "trait_type": "soulbound", "value": soulbound }));
    }

    let metadata = json!({
        "name": asset.name,
        "description": registry.describe(id)?,
        "image": format!(
            "data:image/svg+xml;base64,{}",
            base64::Engine::encode(
                &base64::engine::general_purpose::STANDARD,
                document.as_bytes(),
            )
        ),
        "attributes": attributes,
    });

    Ok(serde_json::to_string(&metadata)?)
}
