//! Serve command - run the HTTP front end

use autopr::error::Result;
use autopr::server;
use autopr::workflow::APP_ID;
use std::net::SocketAddr;

/// Run the HTTP front end on the given port
pub async fn run_serve(port: u16) -> Result<()> {
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    server::serve(addr, APP_ID).await
}
