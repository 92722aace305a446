use access_client::{AccessTypeAdapter, ClientAdapter, Page, ReqwestTransport, TemplateContext};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn config_from_env() -> serde_json::Value {
    if let Ok(raw) = std::env::var("ACCESS_CONFIG") {
        return serde_json::from_str(&raw).expect("ACCESS_CONFIG must be valid JSON");
    }
    let mut config = serde_json::Map::new();
    if let Ok(url) = std::env::var("ACCESS_AUTHORIZATION_URL") {
        config.insert("authorization".to_string(), url.into());
    }
    if let Ok(url) = std::env::var("ACCESS_PINGBACK_URL") {
        config.insert("pingback".to_string(), url.into());
    }
    serde_json::Value::Object(config)
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let source_url = std::env::var("ACCESS_SOURCE_URL")
        .expect("ACCESS_SOURCE_URL environment variable is required");
    let page = Page::parse(&source_url).expect("invalid ACCESS_SOURCE_URL");

    let context = match std::env::var("ACCESS_READER_ID") {
        Ok(id) if !id.is_empty() => TemplateContext::with_reader_id(page.clone(), id),
        _ => TemplateContext::new(page.clone()),
    };

    let run_pingback = std::env::var("ACCESS_PINGBACK")
        .map(|v| v == "true" || v == "1")
        .unwrap_or(false);

    let transport = match ReqwestTransport::new(page.clone()) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let adapter = match ClientAdapter::new(&page, &config_from_env(), context, transport) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    println!("Page origin: {}", page.origin());
    println!("Reader ID:   {}", adapter.context().reader_id());
    println!(
        "Config:\n{}\n",
        serde_json::to_string_pretty(&adapter.config_json()).unwrap_or_default()
    );

    match adapter.authorize().await {
        Ok(entitlement) => {
            println!("Authorization response:");
            println!(
                "{}",
                serde_json::to_string_pretty(&entitlement).unwrap_or_default()
            );
            adapter.context().set_auth_response(entitlement).await;
        }
        Err(e) => {
            eprintln!("Authorization failed: {e}");
            std::process::exit(1);
        }
    }

    if run_pingback {
        if let Err(e) = adapter.pingback().await {
            eprintln!("Pingback failed: {e}");
            std::process::exit(1);
        }
        println!("\nPingback sent");
    }
}
