/// Peer-evaluation server.
#[derive(clap::Parser, Debug)]
#[command(version, about, long_about = None)]
pub(crate) struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(clap::Subcommand, Debug, Default)]
pub(crate) enum Command {
    /// Runs the server
    #[default]
    Run,
    /// Migrates the database to the latest schema
    Migrate,
    /// Migrates the database and creates the admin account and sample levels
    Init,
}
