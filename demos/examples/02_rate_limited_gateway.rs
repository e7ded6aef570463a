use std::time::Instant;

use probewire::{LimiterConfig, RateLimitedGateway, TelemetryProvider};
use probewire_demos::common::get_provider;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1) A tiny budget for demo purposes: 3 calls back-to-back, then 4 per second
    let gateway = RateLimitedGateway::new(get_provider(), LimiterConfig::new(3.0, 4.0))?;
    println!("Gateway identity: {}", gateway.name());

    // 2) The first three calls pass immediately; the rest wait for the bucket to leak
    let started = Instant::now();
    for i in 1..=6 {
        let devices = gateway.list_devices().await?;
        println!(
            "call {i}: {} devices after {:?} (tokens={:.2})",
            devices.len(),
            started.elapsed(),
            gateway.limiter().tokens()
        );
    }

    // 3) Failed calls still spend their token
    let before = gateway.limiter().tokens();
    let failed = gateway.device(probewire_mock::FAILING_DEVICE).await;
    println!(
        "failing call: error={} tokens {before:.2} -> {:.2}",
        failed.is_err(),
        gateway.limiter().tokens()
    );

    Ok(())
}
