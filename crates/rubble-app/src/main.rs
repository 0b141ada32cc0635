use rubble_app::game_loop;
use rubble_core::enums::CityKind;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let mut seed = 42u64;
    let mut city = CityKind::Waterfront;
    let mut ticks = 1200u64;
    let mut fast = false;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--seed" => {
                seed = args
                    .next()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(seed);
            }
            "--ticks" => {
                ticks = args
                    .next()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(ticks);
            }
            "--downtown" => city = CityKind::Downtown,
            "--fast" => fast = true,
            other => {
                eprintln!("unknown argument: {other}");
                eprintln!("usage: rubble [--seed N] [--ticks N] [--downtown] [--fast]");
                std::process::exit(2);
            }
        }
    }

    let snapshot = game_loop::run(seed, city, ticks, fast);
    println!(
        "{}",
        serde_json::to_string_pretty(&snapshot).expect("snapshot serializes")
    );
}
