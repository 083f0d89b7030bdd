//! Browse (catalog) page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::instrument;

use crate::catalog::Coffee;
use crate::filters;
use crate::state::AppState;

/// Browse query parameters.
#[derive(Debug, Deserialize)]
pub struct BrowseQuery {
    /// Text filter over coffee names.
    #[serde(default)]
    pub q: String,
}

/// Coffee card display data for templates.
#[derive(Clone)]
pub struct CoffeeCardView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub tags: Vec<String>,
    pub price: String,
    pub image: String,
}

impl From<&Coffee> for CoffeeCardView {
    fn from(coffee: &Coffee) -> Self {
        Self {
            id: coffee.id.to_string(),
            name: coffee.name.clone(),
            description: coffee.description.clone(),
            tags: coffee.tags.clone(),
            price: coffee.price.to_string(),
            image: coffee.image.clone(),
        }
    }
}

/// Browse page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/home.html")]
pub struct HomeTemplate {
    pub coffees: Vec<CoffeeCardView>,
    pub query: String,
}

/// Display the catalog, filtered by the `q` query parameter.
#[instrument(skip(state))]
pub async fn home(
    State(state): State<AppState>,
    Query(query): Query<BrowseQuery>,
) -> impl IntoResponse {
    let coffees = state
        .catalog()
        .filter(&query.q)
        .into_iter()
        .map(CoffeeCardView::from)
        .collect();

    HomeTemplate {
        coffees,
        query: query.q,
    }
}
