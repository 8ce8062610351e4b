// service/inventory.rs
use std::collections::{BTreeMap, HashMap, HashSet};

use ammonia::Builder;

use crate::{
    models::inventorymodel::{InventoryModel, PriceRange, VehicleVariant},
    utils::{currency::paise_to_rupees, decimal::BigDecimalHelpers},
};

/// Groups variants that share a model name, keeping first-seen order.
pub fn group_variants(variants: Vec<VehicleVariant>) -> Vec<InventoryModel> {
    let mut models: Vec<(InventoryModel, i64, i64)> = Vec::new();
    let mut by_name: HashMap<String, usize> = HashMap::new();

    for variant in variants {
        let key = variant.name.trim().to_lowercase();
        let price = variant.price.to_paise_or_zero();

        match by_name.get(&key) {
            Some(&idx) => {
                let (model, min, max) = &mut models[idx];
                *min = (*min).min(price);
                *max = (*max).max(price);
                model.total_stock += variant.stock;
                model.variants.push(variant);
            }
            None => {
                by_name.insert(key, models.len());
                let model = InventoryModel {
                    name: variant.name.trim().to_string(),
                    price_range: PriceRange { min: 0.0, max: 0.0 },
                    total_stock: variant.stock,
                    variants: vec![variant],
                };
                models.push((model, price, price));
            }
        }
    }

    models
        .into_iter()
        .map(|(mut model, min, max)| {
            model.price_range = PriceRange {
                min: paise_to_rupees(min),
                max: paise_to_rupees(max),
            };
            model
        })
        .collect()
}

/// Strips all markup from free text before it is forwarded. The result is
/// plain text, so `&`, `<` and `>` come back unescaped. Passes repeat until
/// the text is stable so entity-encoded tags cannot survive as markup.
pub fn sanitize_text(input: &str) -> String {
    let mut text = strip_markup(input);
    for _ in 0..MAX_SANITIZE_PASSES {
        let next = strip_markup(&text);
        if next == text {
            break;
        }
        text = next;
    }
    text.trim().to_string()
}

const MAX_SANITIZE_PASSES: usize = 4;

fn strip_markup(input: &str) -> String {
    let mut builder = Builder::empty();
    builder.clean_content_tags(HashSet::from(["script", "style"]));
    unescape_text(&builder.clean(input).to_string())
}

/// Reverses the escaping the HTML serializer applies to text nodes.
fn unescape_text(html: &str) -> String {
    html.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&nbsp;", "\u{a0}")
        .replace("&amp;", "&")
}

pub fn sanitize_specifications(
    specs: &BTreeMap<String, serde_json::Value>,
) -> BTreeMap<String, serde_json::Value> {
    specs
        .iter()
        .map(|(key, value)| {
            let value = match value {
                serde_json::Value::String(text) => serde_json::Value::String(sanitize_text(text)),
                other => other.clone(),
            };
            (sanitize_text(key), value)
        })
        .collect()
}
