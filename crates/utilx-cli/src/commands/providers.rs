//! Providers command - list the supported bill issuers.

use console::style;

use utilx_core::bill::registry::keywords;
use utilx_core::Provider;

pub async fn run() -> anyhow::Result<()> {
    println!("{}", style("Supported providers (detection order):").bold());
    println!();
    println!(
        "  {:<24} {:<26} {:<12} {:<6} {}",
        "ID", "NAME", "USAGE", "UNIT", "KEYWORDS"
    );

    for provider in Provider::ALL {
        let usage = provider.expected_usage_type();
        println!(
            "  {:<24} {:<26} {:<12} {:<6} {}",
            style(provider.id()).cyan(),
            provider.display_name(),
            usage.to_string(),
            usage.unit().symbol(),
            keywords(provider).join(", ")
        );
    }

    Ok(())
}
