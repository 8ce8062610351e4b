// handler/distributor.rs
use std::{future::Future, sync::Arc, time::Duration};

use axum::{
    extract::Query,
    response::IntoResponse,
    routing::{get, put},
    Extension, Json, Router,
};
use validator::Validate;

use crate::{
    api::distributorapi::DistributorExt,
    dtos::{common::*, distributordtos::*},
    error::HttpError,
    models::{
        distributormodel::{DistributorDashboardStats, Nominee},
        milestonemodel::Milestone,
        usermodel::AuthUser,
    },
    service::{
        binary_tree::{extract_team_members, members_on_side, side_totals},
        commission::{calculate, derive_pair, summarize_pairs, CommissionInputs},
        error::ServiceError,
        fetch::{settle, FetchState},
        milestone,
        referral::referral_links,
        supersede::RequestRegistry,
    },
    AppState,
};

/// How long the dashboard waits on any one section before reporting it as
/// still loading.
const SECTION_DEADLINE: Duration = Duration::from_secs(8);

pub fn distributor_handler() -> Router {
    Router::new()
        .route("/earnings", get(get_earnings))
        .route("/milestones", get(get_milestones))
        .route("/team", get(get_team))
        .route("/pairs", get(get_pairs))
        .route("/dashboard", get(get_dashboard))
        .route("/referral-link", get(get_referral_link))
        .route("/nominee", put(update_nominee))
}

fn milestones_view(milestones: &[Milestone], stats: &DistributorDashboardStats) -> MilestonesResponseDto {
    let inputs = CommissionInputs::from(stats);
    let progress = milestone::evaluate(milestones, inputs.total_referrals, inputs.total_pairs);
    let summary = milestone::summarize(&progress);

    MilestonesResponseDto {
        summary: MilestoneSummaryDto::from(&summary),
        milestones: progress.into_iter().map(MilestoneDto::from).collect(),
    }
}

pub async fn get_earnings(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse, HttpError> {
    let stats = app_state.api_client.get_dashboard_stats(&user).await?;
    let breakdown = calculate(&CommissionInputs::from(&stats));

    Ok(Json(ApiResponse::success(
        "Earnings retrieved successfully",
        EarningsResponseDto::from(&breakdown),
    )))
}

pub async fn get_milestones(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse, HttpError> {
    let (milestones, stats) = futures::join!(
        app_state.api_client.get_milestones(&user),
        app_state.api_client.get_dashboard_stats(&user),
    );
    let stats = stats?;

    // The catalog is optional; the built-in one applies when it is missing.
    let milestones = milestones.unwrap_or_else(|e| {
        tracing::warn!("Milestone list unavailable, using defaults: {}", e);
        Vec::new()
    });

    Ok(Json(ApiResponse::success(
        "Milestones retrieved successfully",
        milestones_view(&milestones, &stats),
    )))
}

pub async fn get_team(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<TeamQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    let (tree, info) = futures::join!(
        app_state.api_client.get_binary_tree(&user),
        app_state.api_client.get_distributor_info(&user),
    );
    let tree = tree?;

    let members = match query.side {
        Some(side) => members_on_side(tree.as_ref(), side),
        None => extract_team_members(tree.as_ref()),
    };
    let members: Vec<_> = members.into_iter().filter(|m| query.keeps(m)).collect();

    let sides = side_totals(tree.as_ref());
    let counts_match = match info {
        Ok(info) => Some(info.left_count == sides.left_count && info.right_count == sides.right_count),
        Err(e) => {
            tracing::warn!("Distributor info unavailable for team cross-check: {}", e);
            None
        }
    };
    if counts_match == Some(false) {
        tracing::warn!("Tree side counts for user {} disagree with reported counts", user.user_id);
    }

    Ok(Json(ApiResponse::success(
        "Team retrieved successfully",
        TeamResponseDto {
            total_members: members.len(),
            members,
            weaker_side_pv: sides.weaker_side_pv(),
            sides,
            counts_match,
        },
    )))
}

pub async fn get_pairs(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<PageQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    query.validate().map_err(|e| HttpError::bad_request(e.to_string()))?;

    let key = RequestRegistry::key(&user.user_id, "/distributor/pairs");
    let page = app_state
        .requests
        .run_latest(&key, async {
            Ok::<_, ServiceError>(app_state.api_client.get_pair_history(&user, &query).await?)
        })
        .await?;

    let page = page.map(|pair| derive_pair(&pair));
    let totals = summarize_pairs(&page.results);
    if totals.inconsistent > 0 {
        tracing::warn!("{} pair rows with inconsistent net amounts for user {}", totals.inconsistent, user.user_id);
    }

    Ok(Json(ApiResponse::success(
        "Pair history retrieved successfully",
        PairHistoryResponseDto {
            page_totals: PairTotalsDto::from(&totals),
            page: PaginatedResponse::from_page(page, query.page, query.page_size, PairViewDto::from),
        },
    )))
}

async fn section<T, F>(wanted: bool, fut: F) -> FetchState<T>
where
    F: Future<Output = FetchState<T>>,
{
    if wanted {
        fut.await
    } else {
        FetchState::Idle
    }
}

pub async fn get_dashboard(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<DashboardQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    let wants_stats = query.wants(DashboardSection::Stats);
    let wants_binary = query.wants(DashboardSection::Binary);
    let wants_milestones = query.wants(DashboardSection::Milestones);

    let client = app_state.api_client.clone();
    let (stats, binary, milestone_list) = futures::join!(
        section(wants_stats || wants_milestones, {
            let (client, user) = (client.clone(), user.clone());
            settle(SECTION_DEADLINE, async move { client.get_dashboard_stats(&user).await })
        }),
        section(wants_binary, {
            let (client, user) = (client.clone(), user.clone());
            settle(SECTION_DEADLINE, async move { client.get_binary_stats(&user).await })
        }),
        section(wants_milestones, {
            let (client, user) = (client.clone(), user.clone());
            settle(SECTION_DEADLINE, async move { client.get_milestones(&user).await })
        }),
    );

    let milestones = if !wants_milestones {
        FetchState::Idle
    } else {
        match (&stats, milestone_list) {
            (FetchState::Success(stats), FetchState::Success(list)) => {
                FetchState::Success(milestones_view(&list, stats))
            }
            (FetchState::Success(stats), FetchState::Error(e)) => {
                tracing::warn!("Milestone list unavailable, using defaults: {}", e);
                FetchState::Success(milestones_view(&[], stats))
            }
            (FetchState::Success(_), FetchState::Loading) => FetchState::Loading,
            (FetchState::Success(_), FetchState::Idle) => FetchState::Idle,
            (FetchState::Error(e), _) => FetchState::Error(e.clone()),
            (FetchState::Loading, _) => FetchState::Loading,
            (FetchState::Idle, _) => FetchState::Idle,
        }
    };

    let stats = if wants_stats {
        stats.map(|stats| {
            let breakdown = calculate(&CommissionInputs::from(&stats));
            DashboardStatsDto::new(&stats, &breakdown)
        })
    } else {
        FetchState::Idle
    };

    let binary = binary.map(|stats| BinarySummaryDto {
        weaker_side_pv: stats.left_pv.min(stats.right_pv),
        stats,
    });

    Ok(Json(ApiResponse::success(
        "Dashboard retrieved successfully",
        DashboardResponseDto {
            stats,
            binary,
            milestones,
        },
    )))
}

pub async fn get_referral_link(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse, HttpError> {
    let info = app_state.api_client.get_distributor_info(&user).await?;

    if info.referral_code.trim().is_empty() {
        return Err(HttpError::not_found("Referral code has not been assigned yet"));
    }

    Ok(Json(ApiResponse::success(
        "Referral link generated successfully",
        referral_links(&app_state.env.app_url, &info.referral_code),
    )))
}

pub async fn update_nominee(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<NomineeUpdateDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate().map_err(|e| HttpError::bad_request(e.to_string()))?;

    let nominee: Nominee = body.into();
    let saved = app_state.api_client.update_nominee(&user, &nominee).await?;

    tracing::info!("Nominee updated for user {}", user.user_id);
    Ok(Json(ApiResponse::success("Nominee updated successfully", saved)))
}
