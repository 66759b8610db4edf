use std::path::PathBuf;
use std::process::{ExitCode, Termination};

use structopt::StructOpt;

use snapvault::backup::{self, BackupOptions};
use snapvault::config::Settings;
use snapvault::disk::DiskClient;
use snapvault::vk::VkClient;

/// Back up a VK user's photos to Yandex.Disk.
#[derive(StructOpt)]
struct Args {
    /// VK user ID whose photos to back up.
    #[structopt(name = "USER_ID")]
    user_id: String,

    /// Path to the INI settings file with the [Token] section.
    #[structopt(
        long,
        default_value = "settings.ini",
        parse(from_os_str),
        env = "SNAPVAULT_SETTINGS"
    )]
    settings: PathBuf,

    /// Number of photos to back up.
    #[structopt(long, default_value = "5")]
    count: u32,

    /// Album to take the photos from.
    #[structopt(long, default_value = "profile")]
    album: String,

    /// Path the manifest of backed-up photos is written to.
    #[structopt(long, default_value = "data.json", parse(from_os_str))]
    manifest: PathBuf,
}

enum Exit<T> {
    Ok,
    Err(T),
}

impl<T: Into<u8> + std::fmt::Display> Termination for Exit<T> {
    fn report(self) -> ExitCode {
        match self {
            Exit::Ok => ExitCode::SUCCESS,
            Exit::Err(err) => {
                eprintln!("Error: {}", err);
                ExitCode::from(err.into())
            },
        }
    }
}

async fn run(args: Args) -> Result<(), snapvault::Error> {
    let settings = Settings::load(&args.settings)?;
    let vk = VkClient::new(settings.vk_token);
    let disk = DiskClient::new(settings.yd_token);

    let options = BackupOptions {
        user_id: args.user_id,
        count: args.count,
        album_id: args.album,
        manifest_path: args.manifest,
    };
    let report = backup::run(&vk, &disk, &options).await?;

    log::info!(
        "backed up {} of {} selected photos ({} skipped)",
        report.uploaded,
        report.selected,
        report.skipped
    );

    Ok(())
}

#[async_std::main]
async fn main() -> Exit<snapvault::Error> {
    dotenv::dotenv().ok();
    env_logger::init();

    match run(Args::from_args()).await {
        Ok(()) => Exit::Ok,
        Err(err) => Exit::Err(err),
    }
}
