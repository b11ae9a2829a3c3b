//! GraphQL adapter
//!
//! `POST /graphql` executes queries and mutations; `GET /graphql` serves GraphiQL. Catalog failures
//! surface as GraphQL errors whose `extensions.code` is one of `VALIDATION_ERROR`, `NOT_FOUND`,
//! `REFERENTIAL_ERROR` or `INTERNAL_ERROR`, with `extensions.field` when the error names one.

use async_graphql::http::GraphiQLSource;
use async_graphql::{Context, EmptySubscription, ErrorExtensions, Schema};
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{extract::State, response::Html, routing::get, Router};
use streamcat_common::{Catalog, CatalogError, ErrorKind};

use crate::{api, AppState};

pub mod schema;
pub mod types;

pub use schema::{MutationRoot, QueryRoot};

/// Listener name reported by `/health`
pub const MODULE: &str = "streamcat-graphql";

pub type CatalogSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

pub fn build_schema(state: AppState) -> CatalogSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(state)
        .finish()
}

/// Build the GraphQL router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/graphql", get(graphiql).post(graphql_handler))
        .merge(api::health_routes(MODULE))
        .with_state(build_schema(state))
}

async fn graphql_handler(
    State(schema): State<CatalogSchema>,
    req: GraphQLRequest,
) -> GraphQLResponse {
    schema.execute(req.into_inner()).await.into()
}

async fn graphiql() -> Html<String> {
    Html(GraphiQLSource::build().endpoint("/graphql").finish())
}

pub(crate) fn catalog<'a>(ctx: &Context<'a>) -> async_graphql::Result<&'a dyn Catalog> {
    Ok(ctx.data::<AppState>()?.catalog.as_ref())
}

pub fn error_code(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::Validation => "VALIDATION_ERROR",
        ErrorKind::NotFound => "NOT_FOUND",
        ErrorKind::Referential => "REFERENTIAL_ERROR",
        ErrorKind::Internal => "INTERNAL_ERROR",
    }
}

pub(crate) fn gql_error(err: CatalogError) -> async_graphql::Error {
    let code = error_code(err.kind());
    let field = err.field().map(str::to_string);
    async_graphql::Error::new(err.to_string()).extend_with(move |_, ext| {
        ext.set("code", code.to_string());
        if let Some(field) = field {
            ext.set("field", field);
        }
    })
}
