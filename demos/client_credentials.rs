//! Demonstrates obtaining Graph application tokens in every output mode against a mock
//! authority, with the default reqwest transport and in-memory store.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
// self
use graph_app_token::{
	auth::DEFAULT_SCOPE,
	config::BrokerConfig,
	flows::Broker,
	store::{MemoryStore, TokenStore},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/tenant-acme/oauth2/v2.0/token");
			then.status(200).header("content-type", "application/json").body(
				"{\"access_token\":\"demo-access\",\"token_type\":\"Bearer\",\"expires_in\":3599}",
			);
		})
		.await;
	let store: Arc<dyn TokenStore> = Arc::new(MemoryStore::default());
	let config = BrokerConfig::builder().authority(server.base_url()).build()?;
	let broker = Broker::new(store, config)?;

	for mode in ["token", "bearer", "raw", "token"] {
		let value = broker
			.obtain("tenant-acme", "service-router", "super-secret", DEFAULT_SCOPE, mode)
			.await?;

		match value.expose() {
			Some(token) => println!("{mode}: {token}."),
			None => println!("{mode}: {}.", serde_json::to_string(&value.as_raw())?),
		}
	}

	if let Err(e) =
		broker.obtain("tenant-acme", "service-router", "super-secret", DEFAULT_SCOPE, "jwt").await
	{
		println!("Unknown mode rejected: {e}");
	}

	// One fetch per mode; the repeated `token` request is served from the cache.
	token_mock.assert_calls_async(3).await;

	println!("Metrics: {:?}.", broker.metrics);

	Ok(())
}
