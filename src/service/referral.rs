// service/referral.rs
use serde::Serialize;

use crate::models::binarymodel::NodePosition;

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct ReferralLinks {
    pub referral_code: String,
    pub link: String,
    /// Sign-ups through these land on a fixed side of the tree.
    pub left_link: String,
    pub right_link: String,
}

pub fn generate_referral_link(base_url: &str, code: &str, position: Option<NodePosition>) -> String {
    let mut params = vec![("ref", code.trim())];
    match position {
        Some(NodePosition::Left) => params.push(("position", "left")),
        Some(NodePosition::Right) => params.push(("position", "right")),
        Some(NodePosition::Root) | None => {}
    }

    // Only &str pairs go in, which always encode.
    let query = serde_urlencoded::to_string(&params).unwrap_or_default();
    format!("{}/register?{}", base_url.trim_end_matches('/'), query)
}

pub fn referral_links(base_url: &str, code: &str) -> ReferralLinks {
    ReferralLinks {
        referral_code: code.trim().to_string(),
        link: generate_referral_link(base_url, code, None),
        left_link: generate_referral_link(base_url, code, Some(NodePosition::Left)),
        right_link: generate_referral_link(base_url, code, Some(NodePosition::Right)),
    }
}
