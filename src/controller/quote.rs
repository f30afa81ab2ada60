use crate::{
    model::{ApiResult, QuotePayload},
    provider::QuoteProvider,
    repository::QuoteRepository,
    service::quote,
};
use rocket::{get, State};

#[get("/cotacao")]
pub async fn get(
    provider: &State<Box<dyn QuoteProvider>>,
    repo: &State<QuoteRepository>,
) -> ApiResult<QuotePayload> {
    let lookup = quote::lookup(provider.inner().as_ref(), repo.inner()).await;
    ApiResult::new(lookup.map(|it| it.quote.into()))
}

#[cfg(test)]
mod test {
    use crate::{
        model::QuotePayload,
        provider::{AwesomeApi, UpstreamConf},
        repository::{DbConf, QuoteRepository},
        test::{client, quote, serve_once, temp_path, StubProvider, UPSTREAM_BODY},
    };
    use rocket::http::{ContentType, Status};
    use serde_json::Value;
    use std::time::Duration;

    fn repo(name: &str) -> QuoteRepository {
        QuoteRepository::new(DbConf {
            url: temp_path(name).to_string_lossy().into(),
            timeout_ms: 1000,
        })
    }

    #[rocket::async_test]
    async fn get() {
        let conf = DbConf {
            url: temp_path("get.db").to_string_lossy().into(),
            timeout_ms: 1000,
        };
        let repo = QuoteRepository::new(conf.clone());
        let client = client(Box::new(StubProvider::ok(quote())), repo).await;

        let res = client.get("/cotacao").dispatch().await;
        assert_eq!(Status::Ok, res.status());
        assert_eq!(Some(ContentType::JSON), res.content_type());
        let body = res.into_json::<QuotePayload>().await.unwrap();
        assert_eq!(quote(), body.usdbrl);

        let stored = QuoteRepository::new(conf).select_all().unwrap();
        assert_eq!(1, stored.len());
        assert_eq!(quote(), stored[0].quote);
    }

    #[rocket::async_test]
    async fn get_passes_upstream_through() {
        let url = serve_once("200 OK", UPSTREAM_BODY, Duration::ZERO).await;
        let provider = AwesomeApi::new(UpstreamConf {
            url,
            timeout_ms: 1000,
        })
        .unwrap();
        let client = client(Box::new(provider), repo("passthrough.db")).await;

        let res = client.get("/cotacao").dispatch().await;
        assert_eq!(Status::Ok, res.status());
        let body: Value = serde_json::from_str(&res.into_string().await.unwrap()).unwrap();
        let upstream: Value = serde_json::from_str(UPSTREAM_BODY).unwrap();
        assert_eq!(upstream, body);
    }

    #[rocket::async_test]
    async fn get_upstream_non_200() {
        let url = serve_once("404 Not Found", r#"{"status":404}"#, Duration::ZERO).await;
        let provider = AwesomeApi::new(UpstreamConf {
            url,
            timeout_ms: 1000,
        })
        .unwrap();
        let client = client(Box::new(provider), repo("non_200.db")).await;

        let res = client.get("/cotacao").dispatch().await;
        assert_eq!(Status::InternalServerError, res.status());
        assert_eq!(Some(ContentType::JSON), res.content_type());
        let body: Value = serde_json::from_str(&res.into_string().await.unwrap()).unwrap();
        assert!(body["Error"].as_str().unwrap().contains("404"));
    }

    #[rocket::async_test]
    async fn get_fetch_failed() {
        let provider = StubProvider::err("connection refused");
        let client = client(Box::new(provider), repo("fetch_failed.db")).await;

        let res = client.get("/cotacao").dispatch().await;
        assert_eq!(Status::InternalServerError, res.status());
        let body: Value = serde_json::from_str(&res.into_string().await.unwrap()).unwrap();
        assert_eq!("connection refused", body["Error"]);
    }

    #[rocket::async_test]
    async fn get_store_failed() {
        let repo = QuoteRepository::new(DbConf {
            url: temp_path("missing").join("store.db").to_string_lossy().into(),
            timeout_ms: 1000,
        });
        let client = client(Box::new(StubProvider::ok(quote())), repo).await;

        let res = client.get("/cotacao").dispatch().await;
        assert_eq!(Status::Ok, res.status());
        let body = res.into_json::<QuotePayload>().await.unwrap();
        assert_eq!(quote(), body.usdbrl);
    }
}
