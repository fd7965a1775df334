use parche_kiosk_lib::KioskConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = KioskConfig::load();
    parche_kiosk_lib::run(config).await
}
