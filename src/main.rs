use structopt::StructOpt;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use anyhow::Result;
use fern::colors::{ColoredLevelConfig, Color};
use fern::Output;
use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use std::io::Write;
use ember::core::ember::{Float, get_progress_bar, set_progress_bar};
use ember::core::adaptive::AdaptiveSampling;
use ember::core::buffers::RenderBuffers;
use ember::core::camera::OrthographicCamera;
use ember::core::closure::{Bsdf, ClosureStack, ShaderClosures};
use ember::core::geometry::normal::Normal3f;
use ember::core::geometry::point::{Point2i, Point3f};
use ember::core::geometry::ray::Ray;
use ember::core::geometry::vector::Vector3f;
use ember::core::scene::{ClosureRegistry, Hit, SceneProvider};
use ember::core::scheduler::{PathRenderer, RenderSettings};
use ember::core::spectrum::Spectrum;
use ember::closures::principled_diffuse::PrincipledDiffuseBsdf;

#[derive(StructOpt, Debug)]
#[structopt(name = "ember")]
struct Args {
    /// set LOG verbosity
    #[structopt(short, long)]
    verbose: bool,

    /// Specify the file that log output should be written to.
    /// Default: ember.log in the working directory.
    #[structopt(short, long)]
    logfile: Option<PathBuf>,

    /// Print all logging messages to stderr
    #[structopt(short = "e", long)]
    logtostderr: bool,

    /// Use specified number of threads for rendering
    #[structopt(short, long, default_value = "0")]
    nthreads: u8,

    /// Image width in pixels
    #[structopt(long, default_value = "256")]
    width: usize,

    /// Image height in pixels
    #[structopt(long, default_value = "256")]
    height: usize,

    /// Samples per pixel per scheduling round
    #[structopt(short, long, default_value = "16")]
    samples: usize,

    /// Maximum number of scheduling rounds
    #[structopt(short, long, default_value = "16")]
    rounds: usize,

    /// Adaptive sampling noise threshold
    #[structopt(long, default_value = "0.01")]
    noise_threshold: Float,

    /// Surface roughness of the demo material
    #[structopt(long, default_value = "0.5")]
    roughness: Float
}

// Floor plane under a constant sky; enough scene to exercise the full
// pipeline without any asset handling
struct DemoScene {
    plane_z : Float,
    sky     : Spectrum
}

impl SceneProvider for DemoScene {
    fn intersect(&self, ray: &Ray) -> Option<Hit> {
        if ray.d.z >= 0.0 { return None; }

        let t = (self.plane_z - ray.o.z) / ray.d.z;
        if t <= 0.0 || t >= ray.t_max { return None; }

        let n = Normal3f::new(0.0, 0.0, 1.0);

        Some(Hit {
            p: ray.find_point(t),
            t,
            uv: Default::default(),
            ns: n,
            ng: n,
            prim_id: 0
        })
    }

    fn environment(&self, _ray: &Ray) -> Spectrum {
        self.sky
    }
}

struct DemoMaterial {
    albedo      : Spectrum,
    roughness   : Float
}

impl ClosureRegistry for DemoMaterial {
    fn closures_at(&self, hit: &Hit) -> ClosureStack {
        let mut bsdf = PrincipledDiffuseBsdf::new(hit.ns, self.albedo, self.roughness);
        bsdf.setup();

        let mut stack = ClosureStack::new();
        stack.push(ShaderClosures::from(bsdf));

        stack
    }
}

fn setup_logging(verbose: bool, logfile: PathBuf, stderr: bool) -> Result<()> {
    let colors = ColoredLevelConfig::new()
        .error(Color::Red)
        .warn(Color::Yellow);
    let clevel = colors.clone().info(Color::Green);

    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    let mut base_config = fern::Dispatch::new().level(level);

    let file_config = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{}] {}",
                record.level(),
                message
            ))
        })
        .chain(fern::log_file(logfile)?);

    let stderr_config = fern::Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "{color_line}[{level}] {message}\x1B[0m",
                color_line = format_args!("\x1B[{}m", colors.get_color(&record.level()).to_fg_str()),
                level = clevel.color(record.level()),
                message = message,
            ));
        })
        .level(level)
        .chain(
            Output::call(|record| {
                if let Some(pb) = get_progress_bar() {
                    pb.println(record.args().to_string());
                } else {
                    writeln!(std::io::stderr(), "{}", record.args()).ok();
                }
            })
        );

    base_config = base_config.chain(file_config);
    if stderr { base_config = base_config.chain(stderr_config); }
    base_config.apply()?;

    Ok(())
}

fn main() -> Result<()> {
    let args: Args = Args::from_args();

    let nthreads = match args.nthreads {
        0 => num_cpus::get(),
        n => n as usize
    };

    rayon::ThreadPoolBuilder::new().num_threads(nthreads).build_global().unwrap();

    let logfile = args.logfile.clone()
        .unwrap_or_else(|| PathBuf::from("ember.log"));
    setup_logging(args.verbose, logfile, args.logtostderr)?;

    let scene = Arc::new(DemoScene {
        plane_z: 0.0,
        sky: Spectrum::new(1.0)
    });
    let material = Arc::new(DemoMaterial {
        albedo: Spectrum::from_rgb(0.6, 0.5, 0.4),
        roughness: args.roughness
    });
    // Straight-down view covering the whole plane region
    let camera = Arc::new(OrthographicCamera::new(
        Point3f::new(-1.0, -1.0, 1.0),
        Vector3f::new(2.0 / args.width as Float, 0.0, 0.0),
        Vector3f::new(0.0, 2.0 / args.height as Float, 0.0),
        Vector3f::new(0.0, 0.0, -1.0)));

    let buffers = Arc::new(RenderBuffers::new(
        Point2i::new(args.width as isize, args.height as isize)));
    let settings = RenderSettings {
        adaptive: AdaptiveSampling::new(args.noise_threshold, args.samples as u32),
        ..Default::default()
    };
    let cancel = Arc::new(AtomicBool::new(false));
    let renderer = PathRenderer::new(
        scene, material, camera, buffers.clone(), cancel, settings)?;

    let ntiles = renderer.work_tiles(0, args.samples).len();
    let pb = Arc::new(ProgressBar::new((ntiles * args.rounds) as u64));
    pb.set_style(ProgressStyle::default_bar()
        .template("[{elapsed_precise}] [{wide_bar}] {percent}% [{pos}/{len}] ({eta})"));
    set_progress_bar(Some(Arc::downgrade(&pb)));

    let mut converged = false;

    for round in 0..args.rounds {
        renderer.render_samples(round * args.samples, args.samples);

        if renderer.converge_and_filter() {
            converged = true;
            pb.set_position((ntiles * args.rounds) as u64);
            break;
        }
    }

    pb.finish_and_clear();
    set_progress_bar(None);

    let snapshot = buffers.mean_radiance();
    let mean: Float = snapshot.iter().map(|s| s.y()).sum::<Float>()
        / snapshot.len() as Float;

    info!("Rendering finished: converged = {}, {} samples total, mean luminance {:.4}",
          converged, buffers.total_samples(), mean);

    Ok(())
}
