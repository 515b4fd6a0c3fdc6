// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use clap::Parser;
use onelogin_rs::ClientConfig;
use onelogin_test_client::Tester;
use slog::Drain;

#[derive(Debug, Parser)]
#[clap(about = "OneLogin API test client")]
struct Args {
    /// Point at a test server instead of the real subdomain
    #[clap(long)]
    url: Option<String>,

    #[clap(long, default_value = "")]
    subdomain: String,

    #[clap(long, env = "ONELOGIN_CLIENT_ID")]
    client_id: String,

    #[clap(long, env = "ONELOGIN_CLIENT_SECRET")]
    client_secret: String,
}

fn main() -> anyhow::Result<()> {
    let opt: Args = Args::try_parse()?;

    let decorator = slog_term::TermDecorator::new().build();
    let drain = slog_term::FullFormat::new(decorator).build().fuse();
    let drain = slog_async::Async::new(drain).build().fuse();
    let log = slog::Logger::root(drain, slog::o!());

    let config = ClientConfig {
        client_id: opt.client_id,
        client_secret: opt.client_secret,
        subdomain: opt.subdomain,
        timeout: None,
        base_url: opt.url,
    };

    let tester = Tester::new(log, config)?;
    tester.run()?;

    println!("SUCCESS");

    Ok(())
}
