use data_element::DataElement;

use crate::error::AppError;

#[derive(Clone, Debug, clap::Args)]
#[clap(
    name = "resolve",
    about = "Resolve a URI into an element and print a summary"
)]
pub struct Resolve {
    #[clap(help = "URI to resolve into an element")]
    uri: String,

    #[clap(
        long,
        action,
        help = "Print the element's reconstruction config as JSON"
    )]
    config: bool,
}

impl Resolve {
    pub fn run(&self) -> Result<(), AppError> {
        let element = super::registry().resolve(Some(&self.uri))?;
        let bytes = element.get_bytes()?;
        let content_type = element
            .content_type()
            .unwrap_or_else(|| "unknown".to_string());

        println!("kind: {}", element.kind());
        println!("length: {}", bytes.len());
        println!("content-type: {content_type}");

        if self.config {
            println!(
                "{}",
                serde_json::to_string_pretty(&element.get_config())?
            );
        }
        Ok(())
    }
}
