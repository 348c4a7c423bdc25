use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

use crate::config::Settings;
use crate::core::{compute_score_matrix, Matcher, MatchingInput, PartitionKind, QueueDiscipline};
use crate::error::MatchingError;
use crate::models::{
    ComputeScoresRequest, ComputeScoresResponse, ErrorResponse, HealthResponse,
    QuestionnaireMatchingRequest, RunMatchingRequest, RunMatchingResponse, ScoringWeights,
};

/// Application state shared across all handlers
#[derive(Debug, Clone)]
pub struct AppState {
    pub matcher: Matcher,
    pub weights: ScoringWeights,
    pub default_seed: Option<u64>,
    pub max_members: usize,
}

impl AppState {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            matcher: settings.matching.matcher(),
            weights: ScoringWeights::from(&settings.scoring.weights),
            default_seed: settings.matching.default_seed,
            max_members: settings.matching.max_members,
        }
    }

    /// Matcher for one request, applying any per-request overrides
    fn matcher_for(
        &self,
        queue: Option<QueueDiscipline>,
        partition: Option<PartitionKind>,
    ) -> Matcher {
        Matcher::new(
            queue.unwrap_or(self.matcher.discipline()),
            partition.unwrap_or(self.matcher.partition_kind()),
        )
    }

    fn check_population(&self, member_count: usize) -> Result<(), HttpResponse> {
        if member_count > self.max_members {
            tracing::info!("Rejecting population of {} (limit {})", member_count, self.max_members);
            return Err(HttpResponse::BadRequest().json(ErrorResponse {
                error: "Population too large".to_string(),
                message: format!(
                    "population of {} exceeds the limit of {} members",
                    member_count, self.max_members
                ),
                status_code: 400,
            }));
        }
        Ok(())
    }
}

/// Configure all matching routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/matching/run", web::post().to(run_matching))
        .route("/matching/questionnaire", web::post().to(run_questionnaire_matching))
        .route("/scores/compute", web::post().to(compute_scores));
}

fn matching_error_response(err: &MatchingError) -> HttpResponse {
    if err.is_client_error() {
        tracing::info!("Rejected matching input: {}", err);
        HttpResponse::BadRequest().json(ErrorResponse {
            error: "Invalid matching input".to_string(),
            message: err.to_string(),
            status_code: 400,
        })
    } else {
        tracing::error!("Pairing round failed: {}", err);
        HttpResponse::InternalServerError().json(ErrorResponse {
            error: "Pairing round failed".to_string(),
            message: err.to_string(),
            status_code: 500,
        })
    }
}

fn validation_error_response(errors: validator::ValidationErrors) -> HttpResponse {
    tracing::info!("Validation failed: field_errors={:?}", errors);
    HttpResponse::BadRequest().json(ErrorResponse {
        error: "Validation failed".to_string(),
        message: errors.to_string(),
        status_code: 400,
    })
}

/// Health check endpoint
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Run a pairing round over a precomputed score matrix
///
/// POST /api/v1/matching/run
///
/// Request body:
/// ```json
/// {
///   "scores": [[0.0, 0.7], [0.4, 0.0]],
///   "genderIdentities": ["Male", "Female"],
///   "orientations": ["PrefersWomen", "PrefersMen"],
///   "seed": 42,
///   "queue": "fifo",
///   "partition": "random"
/// }
/// ```
async fn run_matching(
    state: web::Data<AppState>,
    req: web::Json<RunMatchingRequest>,
) -> impl Responder {
    if let Err(response) = state.check_population(req.member_count()) {
        return response;
    }

    let req = req.into_inner();
    let input = match MatchingInput::parse(
        req.scores,
        req.gender_identities.as_slice(),
        req.orientations.as_slice(),
    ) {
        Ok(input) => input,
        Err(e) => return matching_error_response(&e),
    };

    let seed = req.seed.or(state.default_seed);
    let matcher = state.matcher_for(req.queue, req.partition);

    tracing::info!("Running pairing round for {} members (seed: {:?})", input.len(), seed);

    match matcher.run(&input, seed) {
        Ok(outcome) => {
            let response = RunMatchingResponse::from(outcome);
            tracing::info!(
                "Run {} paired {} couples, {} unmatched",
                response.run_id,
                response.pairs.len(),
                response.unmatched.len()
            );
            HttpResponse::Ok().json(response)
        }
        Err(e) => matching_error_response(&e),
    }
}

/// Compute a score matrix from questionnaire submissions
///
/// POST /api/v1/scores/compute
async fn compute_scores(
    state: web::Data<AppState>,
    req: web::Json<ComputeScoresRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error_response(errors);
    }
    if let Err(response) = state.check_population(req.members.len()) {
        return response;
    }

    tracing::info!("Computing scores for {} members", req.members.len());

    match compute_score_matrix(&req.members, &state.weights) {
        Ok(scores) => HttpResponse::Ok().json(ComputeScoresResponse {
            scores: scores.into_rows(),
        }),
        Err(e) => matching_error_response(&e),
    }
}

/// Score questionnaire submissions and pair them in one request
///
/// POST /api/v1/matching/questionnaire
async fn run_questionnaire_matching(
    state: web::Data<AppState>,
    req: web::Json<QuestionnaireMatchingRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error_response(errors);
    }
    if let Err(response) = state.check_population(req.members.len()) {
        return response;
    }

    let outcome = compute_score_matrix(&req.members, &state.weights)
        .and_then(|scores| {
            let members = req
                .members
                .iter()
                .enumerate()
                .map(|(id, profile)| profile.member(id))
                .collect();
            MatchingInput::from_members(members, scores)
        })
        .and_then(|input| {
            let seed = req.seed.or(state.default_seed);
            tracing::info!(
                "Running questionnaire pairing round for {} members (seed: {:?})",
                input.len(),
                seed
            );
            state.matcher_for(req.queue, req.partition).run(&input, seed)
        });

    match outcome {
        Ok(outcome) => HttpResponse::Ok().json(RunMatchingResponse::from(outcome)),
        Err(e) => matching_error_response(&e),
    }
}
