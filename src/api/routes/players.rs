use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::calculate::{bmi_text, round2, win_rate};
use crate::models::{Country, Player, PlayerData, PlayerId, PlayerPatch, Statistic};

// ── Responses ───────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct CountryResponse {
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerDataResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    pub last: Vec<i32>,
    pub win_rate: f64,
    pub bmi: String,
}

impl From<&PlayerData> for PlayerDataResponse {
    fn from(data: &PlayerData) -> Self {
        Self {
            rank: data.rank,
            points: data.points,
            weight: data.weight,
            height: data.height,
            age: data.age,
            last: data.last.clone(),
            win_rate: win_rate(data),
            bmi: bmi_text(data),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PlayerResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<PlayerId>,
    pub firstname: String,
    pub lastname: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shortname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sex: Option<String>,
    /// Omitted unless the country has a code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<CountryResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<PlayerDataResponse>,
}

impl From<Player> for PlayerResponse {
    fn from(player: Player) -> Self {
        let country = if player.has_valid_country() {
            player.country.map(|c| CountryResponse {
                code: c.code,
                picture: c.picture,
            })
        } else {
            None
        };

        Self {
            id: player.id,
            data: player.data.as_ref().map(PlayerDataResponse::from),
            firstname: player.firstname,
            lastname: player.lastname,
            shortname: player.shortname,
            sex: player.sex,
            country,
            picture: player.picture,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CountryStatsResponse {
    #[serde(rename = "countryCode")]
    pub country_code: String,
    #[serde(rename = "winRatio")]
    pub win_ratio: f64,
    #[serde(rename = "averageBMI")]
    pub average_bmi: f64,
    #[serde(rename = "medianHeight")]
    pub median_height: f64,
}

impl From<Statistic> for CountryStatsResponse {
    fn from(stat: Statistic) -> Self {
        Self {
            country_code: stat.country_code,
            win_ratio: round2(stat.win_ratio),
            average_bmi: round2(stat.average_bmi),
            median_height: round2(stat.median_height),
        }
    }
}

// ── Requests ────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CountryRequest {
    pub code: Option<String>,
    pub picture: Option<String>,
}

impl From<CountryRequest> for Country {
    fn from(req: CountryRequest) -> Self {
        Country {
            code: req.code.unwrap_or_default(),
            picture: req.picture,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlayerDataRequest {
    pub rank: Option<u32>,
    pub points: Option<u32>,
    pub weight: Option<u32>,
    pub height: Option<u32>,
    pub age: Option<u32>,
    pub last: Option<Vec<i32>>,
}

impl From<PlayerDataRequest> for PlayerData {
    fn from(req: PlayerDataRequest) -> Self {
        PlayerData {
            rank: req.rank,
            points: req.points,
            weight: req.weight,
            height: req.height,
            age: req.age,
            last: req.last.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlayerCreateRequest {
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub shortname: Option<String>,
    pub sex: Option<String>,
    pub country: Option<CountryRequest>,
    pub picture: Option<String>,
    pub data: Option<PlayerDataRequest>,
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |s| s.trim().is_empty())
}

impl PlayerCreateRequest {
    /// Check required fields, collecting every violation.
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut errors = Vec::new();

        if is_blank(&self.firstname) {
            errors.push("First name is required");
        }
        if is_blank(&self.lastname) {
            errors.push("Last name is required");
        }
        match &self.country {
            None => errors.push("Country is required"),
            Some(country) if is_blank(&country.code) => errors.push("Country code is required"),
            Some(_) => {}
        }
        match &self.data {
            None => errors.push("Player data is required"),
            Some(data) if data.rank.is_none() => errors.push("Rank is required"),
            Some(_) => {}
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ApiError::BadRequest(errors.join(", ")))
        }
    }

    pub fn into_player(self) -> Player {
        Player {
            id: None,
            firstname: self.firstname.unwrap_or_default(),
            lastname: self.lastname.unwrap_or_default(),
            shortname: self.shortname,
            sex: self.sex,
            country: self.country.map(Country::from),
            picture: self.picture,
            data: self.data.map(PlayerData::from),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlayerUpdateRequest {
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub shortname: Option<String>,
    pub sex: Option<String>,
    pub country: Option<CountryRequest>,
    pub picture: Option<String>,
    pub data: Option<PlayerDataRequest>,
}

impl From<PlayerUpdateRequest> for PlayerPatch {
    fn from(req: PlayerUpdateRequest) -> Self {
        PlayerPatch {
            firstname: req.firstname,
            lastname: req.lastname,
            shortname: req.shortname,
            sex: req.sex,
            country: req.country.map(Country::from),
            picture: req.picture,
            data: req.data.map(PlayerData::from),
        }
    }
}

// ── Handlers ────────────────────────────────────────────────────

fn to_responses(players: Vec<Player>) -> Vec<PlayerResponse> {
    players.into_iter().map(PlayerResponse::from).collect()
}

pub async fn list_players(State(state): State<AppState>) -> Json<Vec<PlayerResponse>> {
    Json(to_responses(state.service.get_all_players().await))
}

pub async fn get_player(
    State(state): State<AppState>,
    Path(id): Path<PlayerId>,
) -> Result<Json<PlayerResponse>, ApiError> {
    state
        .service
        .get_player_by_id(id)
        .await
        .map(|p| Json(PlayerResponse::from(p)))
        .ok_or_else(|| ApiError::NotFound(format!("player {}", id)))
}

pub async fn player_ranking(State(state): State<AppState>) -> Json<Vec<PlayerResponse>> {
    Json(to_responses(
        state.service.get_players_sorted_by_rank().await,
    ))
}

pub async fn best_country_ratio(
    State(state): State<AppState>,
) -> Result<Json<CountryStatsResponse>, ApiError> {
    let stat = state.service.get_country_with_best_win_ratio().await?;
    Ok(Json(CountryStatsResponse::from(stat)))
}

pub async fn country_stats(State(state): State<AppState>) -> Json<Vec<CountryStatsResponse>> {
    let stats = state.service.get_country_statistics().await;
    Json(stats.into_iter().map(CountryStatsResponse::from).collect())
}

pub async fn create_player(
    State(state): State<AppState>,
    Json(request): Json<PlayerCreateRequest>,
) -> Result<(StatusCode, Json<PlayerResponse>), ApiError> {
    if let Err(e) = request.validate() {
        tracing::warn!("Rejected player creation: {}", e);
        return Err(e);
    }

    let created = state.service.create_player(request.into_player()).await?;
    Ok((StatusCode::CREATED, Json(PlayerResponse::from(created))))
}

pub async fn update_player(
    State(state): State<AppState>,
    Path(id): Path<PlayerId>,
    Json(request): Json<PlayerUpdateRequest>,
) -> Result<Json<PlayerResponse>, ApiError> {
    let updated = state
        .service
        .update_player(id, PlayerPatch::from(request))
        .await?;
    Ok(Json(PlayerResponse::from(updated)))
}

pub async fn delete_player(State(state): State<AppState>, Path(id): Path<PlayerId>) -> StatusCode {
    state.service.delete_player(id).await;
    StatusCode::NO_CONTENT
}
