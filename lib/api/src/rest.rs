use crate::error::ApiError;
use actix_cors::Cors;
use actix_web::{web, App, HttpResponse, HttpServer, Result as ActixResult};
use magicsearch_core::{CardId, Error, FilterSpec};
use magicsearch_engine::{SearchEngine, SearchHit, SearchQuery};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const EMPTY_RESULTS_MESSAGE: &str = "No cards matched the query";

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub text: Option<String>,
    pub vector: Option<Vec<f32>>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub filters: Option<FilterSpec>,
}

impl SearchRequest {
    fn into_query(self) -> Result<SearchQuery, Error> {
        let mut query = SearchQuery::from_parts(self.text, self.vector)?
            .with_filters(self.filters.unwrap_or_default())
            .with_offset(self.offset.unwrap_or(0));
        if let Some(limit) = self.limit {
            query = query.with_limit(limit);
        }
        Ok(query)
    }
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub results: Vec<SearchHit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

pub struct RestApi;

impl RestApi {
    pub async fn start(engine: Arc<SearchEngine>, port: u16) -> std::io::Result<()> {
        tracing::info!("REST API listening on 0.0.0.0:{}", port);
        HttpServer::new(move || {
            let cors = Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header()
                .max_age(3600);

            App::new()
                .wrap(cors)
                .app_data(web::Data::new(engine.clone()))
                .configure(RestApi::configure)
        })
        .bind(("0.0.0.0", port))?
        .run()
        .await
    }

    /// Routes and request extractors. Expects `web::Data<Arc<SearchEngine>>`.
    pub fn configure(cfg: &mut web::ServiceConfig) {
        let json = web::JsonConfig::default().error_handler(|err, _req| {
            ApiError(Error::InvalidQuery(format!("malformed request body: {}", err))).into()
        });

        cfg.app_data(json)
            .route("/", web::get().to(root))
            .route("/search", web::post().to(search))
            .route("/cards/{id}", web::get().to(get_card));
    }
}

async fn root() -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "MagicSearch Engine"
    })))
}

async fn search(
    engine: web::Data<Arc<SearchEngine>>,
    req: web::Json<SearchRequest>,
) -> Result<HttpResponse, ApiError> {
    let query = req.into_inner().into_query()?;
    let result = engine.search(query).await?;

    let message = result.is_empty().then_some(EMPTY_RESULTS_MESSAGE);
    Ok(HttpResponse::Ok().json(SearchResponse {
        results: result.hits,
        message,
    }))
}

async fn get_card(
    engine: web::Data<Arc<SearchEngine>>,
    path: web::Path<CardId>,
) -> Result<HttpResponse, ApiError> {
    let card = engine.card(path.into_inner())?;
    Ok(HttpResponse::Ok().json(card))
}
