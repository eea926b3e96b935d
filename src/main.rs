use clap::{Parser, ValueEnum};
use hillside::config::GameConfig;
use hillside::entity::AvatarInput;
use hillside::ui::Hud;
use hillside::world::World;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256StarStar;

/// Scripted input driving the headless avatar
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Script {
    /// Stand still and regenerate
    Idle,
    /// Walk right, jumping every two seconds
    Walk,
    /// Jump whenever grounded
    Hop,
}

impl Script {
    fn input(self, frame: u64, fps: u32) -> AvatarInput {
        match self {
            Script::Idle => AvatarInput::new(),
            Script::Walk => AvatarInput {
                right_pressed: true,
                jump_pressed: frame % (2 * fps as u64) == 0,
                ..AvatarInput::new()
            },
            Script::Hop => AvatarInput::jump(),
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// World seed (overrides the configured one)
    #[arg(long)]
    seed: Option<u64>,

    /// Simulated seconds to run
    #[arg(long, default_value = "60")]
    seconds: f32,

    /// Simulation steps per second
    #[arg(long, default_value = "60")]
    fps: u32,

    /// Input script for the avatar
    #[arg(long, value_enum, default_value = "walk")]
    script: Script,

    /// Path to a RON config file (default: config.ron if present)
    #[arg(long)]
    config: Option<String>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(long, short)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let mut config = GameConfig::load(args.config.as_deref())?;
    if let Some(seed) = args.seed {
        config.world.seed = seed;
    }
    anyhow::ensure!(args.fps > 0, "--fps must be positive");
    anyhow::ensure!(
        args.seconds.is_finite() && args.seconds >= 0.0,
        "--seconds must be a non-negative number"
    );

    log::info!(
        "Starting hillside (seed {}, {}s at {} fps, script {:?})",
        config.world.seed,
        args.seconds,
        args.fps,
        args.script
    );

    let mut rng = Xoshiro256StarStar::seed_from_u64(config.world.seed);
    let window_width = config.world.window_width;
    let mut world = World::build(config, &mut rng);
    let hud = Hud::new();

    let dt = 1.0 / args.fps as f32;
    let frames = (args.seconds * args.fps as f32).round() as u64;
    let mut jumps = 0;
    let mut eaten = 0;

    for frame in 0..frames {
        let report = world.tick(dt, &args.script.input(frame, args.fps));
        jumps += report.jumped as u32;
        eaten += report.fruit_eaten;

        // Keep one window of world generated ahead of the avatar
        let ahead = world.avatar().position().x + window_width;
        if let Some((_, generated_to)) = world.extent() {
            if ahead > generated_to as f32 {
                world.extend(generated_to as f32, ahead + window_width, &mut rng);
            }
        }

        if (frame + 1) % args.fps as u64 == 0 {
            if let Some(line) = hud.status_line(&world.stats()) {
                log::info!("{line}");
            }
        }
    }

    let stats = world.stats();
    log::info!("Finished: {stats}");
    log::info!("Jumps this run: {jumps}, fruit eaten: {eaten}");
    Ok(())
}
