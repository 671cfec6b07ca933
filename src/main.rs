use std::env;
use std::io::Read;

use cookflow::Cookflow;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // Recipe text comes from a file argument, or stdin with "-" / no argument
    let args: Vec<String> = env::args().collect();
    let raw_text = match args.get(1).map(String::as_str) {
        Some("-") | None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
        Some(path) => std::fs::read_to_string(path)?,
    };

    let client = Cookflow::from_env()?;
    let extraction = client.extract_recipe(&raw_text).await?;

    println!("{}", serde_json::to_string_pretty(&extraction)?);

    Ok(())
}
