// api/distributorapi.rs
use async_trait::async_trait;
use reqwest::Method;
use serde::Deserialize;

use super::{
    client::{unwrap_envelope, ApiClient, NO_QUERY},
    error::ApiError,
};
use crate::{
    dtos::common::PageQueryDto,
    models::{
        binarymodel::{BinaryNode, BinaryStats, Pair},
        distributormodel::{DistributorDashboardStats, DistributorInfo, Nominee},
        milestonemodel::Milestone,
        usermodel::AuthUser,
        Paginated,
    },
};

#[async_trait]
pub trait DistributorExt {
    async fn get_dashboard_stats(&self, user: &AuthUser) -> Result<DistributorDashboardStats, ApiError>;

    async fn get_distributor_info(&self, user: &AuthUser) -> Result<DistributorInfo, ApiError>;

    /// `None` when the distributor has no downline yet.
    async fn get_binary_tree(&self, user: &AuthUser) -> Result<Option<BinaryNode>, ApiError>;

    async fn get_binary_stats(&self, user: &AuthUser) -> Result<BinaryStats, ApiError>;

    async fn get_pair_history(
        &self,
        user: &AuthUser,
        query: &PageQueryDto,
    ) -> Result<Paginated<Pair>, ApiError>;

    async fn get_milestones(&self, user: &AuthUser) -> Result<Vec<Milestone>, ApiError>;

    async fn update_nominee(&self, user: &AuthUser, nominee: &Nominee) -> Result<Nominee, ApiError>;
}

#[async_trait]
impl DistributorExt for ApiClient {
    async fn get_dashboard_stats(&self, user: &AuthUser) -> Result<DistributorDashboardStats, ApiError> {
        self.get_json(user, "/distributor/dashboard-stats/", NO_QUERY).await
    }

    async fn get_distributor_info(&self, user: &AuthUser) -> Result<DistributorInfo, ApiError> {
        let raw = self.fetch_raw(user, "/distributor/me/", NO_QUERY).await?;
        Ok(serde_json::from_value(unwrap_envelope(raw, "distributor"))?)
    }

    async fn get_binary_tree(&self, user: &AuthUser) -> Result<Option<BinaryNode>, ApiError> {
        let raw = self.fetch_raw(user, "/binary/tree/", NO_QUERY).await?;
        let tree = unwrap_envelope(raw, "tree");
        if tree.is_null() {
            return Ok(None);
        }
        Ok(Some(BinaryNode::deserialize(serde_stacker::Deserializer::new(tree))?))
    }

    async fn get_binary_stats(&self, user: &AuthUser) -> Result<BinaryStats, ApiError> {
        self.get_json(user, "/binary/stats/", NO_QUERY).await
    }

    async fn get_pair_history(
        &self,
        user: &AuthUser,
        query: &PageQueryDto,
    ) -> Result<Paginated<Pair>, ApiError> {
        self.get_json(user, "/binary/pairs/", query).await
    }

    async fn get_milestones(&self, user: &AuthUser) -> Result<Vec<Milestone>, ApiError> {
        let raw = self.fetch_raw(user, "/distributor/milestones/", NO_QUERY).await?;
        let list = unwrap_envelope(raw, "milestones");
        if list.is_null() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_value(list)?)
    }

    async fn update_nominee(&self, user: &AuthUser, nominee: &Nominee) -> Result<Nominee, ApiError> {
        let raw: serde_json::Value = self
            .send_json(Method::PUT, user, "/distributor/nominee/", nominee)
            .await?;
        Ok(serde_json::from_value(unwrap_envelope(raw, "nominee"))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        api::testing::{spawn_upstream, test_user},
        config::Config,
        models::usermodel::UserRole,
    };
    use axum::{http::HeaderMap, http::StatusCode, routing::get, Json, Router};
    use serde_json::json;

    async fn client_for(router: Router) -> ApiClient {
        let url = spawn_upstream(router).await;
        ApiClient::new(&Config::for_upstream(&url)).unwrap()
    }

    #[tokio::test]
    async fn test_token_is_forwarded_and_tree_unwrapped() {
        let router = Router::new().route(
            "/binary/tree/",
            get(|headers: HeaderMap| async move {
                let auth = headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                if auth != "Bearer upstream-token" {
                    return (StatusCode::UNAUTHORIZED, Json(json!({"detail": "no token"})));
                }
                (
                    StatusCode::OK,
                    Json(json!({"tree": {"id": 1, "name": "Me", "position": "root", "children": {
                        "left": {"id": 2, "name": "A", "pv": 500, "position": "left"}
                    }}})),
                )
            }),
        );
        let client = client_for(router).await;

        let tree = client
            .get_binary_tree(&test_user(UserRole::Distributor))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(tree.id, "1");
        assert_eq!(tree.children.left.as_ref().unwrap().pv, 500.0);
    }

    #[tokio::test]
    async fn test_deep_tree_is_decoded() {
        let mut tree = serde_json::Value::Null;
        for i in (1..=100).rev() {
            tree = json!({"id": i, "name": format!("M{}", i), "pv": 100, "position": "left", "children": {"left": tree}});
        }
        let body = json!({"tree": {"id": 0, "name": "Me", "position": "root", "children": {"left": tree}}});
        let router = Router::new().route("/binary/tree/", get(move || async move { Json(body) }));
        let client = client_for(router).await;

        let tree = client.get_binary_tree(&test_user(UserRole::Distributor)).await.unwrap();
        let members = crate::service::binary_tree::extract_team_members(tree.as_ref());
        assert_eq!(members.len(), 100);
        assert_eq!(members[0].referrals, 99);
        assert_eq!(members[99].id, "100");
        assert_eq!(members[99].level, 100);
    }

    #[tokio::test]
    async fn test_empty_tree_is_none() {
        let router = Router::new().route("/binary/tree/", get(|| async { Json(json!({"tree": null})) }));
        let client = client_for(router).await;

        let tree = client.get_binary_tree(&test_user(UserRole::Distributor)).await.unwrap();
        assert!(tree.is_none());
    }

    #[tokio::test]
    async fn test_upstream_error_message_is_kept() {
        let router = Router::new().route(
            "/distributor/dashboard-stats/",
            get(|| async { (StatusCode::FORBIDDEN, Json(json!({"detail": "Not a distributor."}))) }),
        );
        let client = client_for(router).await;

        let err = client
            .get_dashboard_stats(&test_user(UserRole::User))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(err.to_string(), "Not a distributor.");
    }

    #[tokio::test]
    async fn test_pair_history_sends_paging() {
        let router = Router::new().route(
            "/binary/pairs/",
            get(|axum::extract::RawQuery(query): axum::extract::RawQuery| async move {
                Json(json!({
                    "count": 1,
                    "results": [{"id": 9, "commission": "2000.00", "tds": "200.00", "poolMoney": "0", "netAmount": "1800.00"}],
                    "next": null,
                    "previous": null,
                    "query": query,
                }))
            }),
        );
        let client = client_for(router).await;

        let page = client
            .get_pair_history(&test_user(UserRole::Distributor), &PageQueryDto { page: 2, page_size: 5 })
            .await
            .unwrap();
        assert_eq!(page.count, 1);
        assert_eq!(page.results[0].id, "9");

        let raw = client
            .fetch_raw(&test_user(UserRole::Distributor), "/binary/pairs/", &PageQueryDto { page: 2, page_size: 5 })
            .await
            .unwrap();
        assert_eq!(raw["query"], "page=2&page_size=5");
    }
}
