use clap::Parser;
use url::Url;

#[derive(Parser, Debug)]
#[command(
    name = crate::APPLICATION_NAME,
    version = *crate::VERSION,
    about = "Add nodes to a graph server until it runs out of storage"
)]
pub struct Cli {
    /// Server base url, e.g. http://127.0.0.1:8000/api/v1
    pub url: Url,
}
