use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: VersionArgs) -> CliResult<i32> {
    if !args.extended {
        println!("snapshooter {}", env!("CARGO_PKG_VERSION"));
        return Ok(SUCCESS);
    }

    println!("name: snapshooter");
    println!("version: {}", env!("CARGO_PKG_VERSION"));
    println!(
        "target: {}",
        option_env!("SNAPSHOOTER_BUILD_TARGET").unwrap_or("unknown")
    );
    println!("target_os: {}", std::env::consts::OS);
    println!("target_arch: {}", std::env::consts::ARCH);
    println!(
        "rustc: {}",
        option_env!("RUSTC_VERSION").unwrap_or("unknown")
    );
    println!("git_hash: {}", option_env!("GIT_HASH").unwrap_or("unknown"));
    println!(
        "features: stream={}, http={}, cli=true",
        cfg!(feature = "stream"),
        cfg!(feature = "http")
    );
    println!(
        "defaults: retry_delay={:?}, idle_timeout={:?}, max_buffer={}",
        snapshooter_stream::DEFAULT_RETRY_DELAY,
        snapshooter_stream::DEFAULT_IDLE_TIMEOUT,
        snapshooter_frame::DEFAULT_MAX_BUFFER
    );

    Ok(SUCCESS)
}
