use std::{collections::BTreeMap, path::Path, time::Instant};

use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

use crate::{
    buffers::{BufferKind, BufferList, HashBuffer, InfoBuffer, PosBuffer, VelBuffer},
    error::{Error, Result},
    particle_class::ParticleClass,
    scenario_parameters::ScenarioParams,
    Problem, Scenario,
};

const CARGO_PKG_AUTHORS: &str = env!("CARGO_PKG_AUTHORS");
const CARGO_PKG_VERSION: &str = env!("CARGO_PKG_VERSION");
const CARGO_PKG_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

// log the moving boundaries every this many steps
const REPORT_INTERVAL: usize = 1000;

pub fn start() -> Result<()> {
    let matches = App::new("SPH Dam Break Initialization")
        .version(CARGO_PKG_VERSION)
        .author(CARGO_PKG_AUTHORS)
        .about(CARGO_PKG_DESCRIPTION)
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .arg(
            Arg::with_name("v")
                .short("v")
                .multiple(true)
                .help("Sets the level of verbosity"),
        )
        .subcommand(
            SubCommand::with_name("run")
                .about("Build and pack the scenario, then step its moving boundaries")
                .arg(
                    Arg::with_name("SCENARIO_CONFIG")
                        .help("Scenario parameters (YAML)")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::with_name("MAX_SECONDS")
                        .long("max-seconds")
                        .short("s")
                        .required(false)
                        .takes_value(true)
                        .help("Stop after the given amount of simulated seconds"),
                )
                .arg(
                    Arg::with_name("OVERWRITE_CONFIG_FILE")
                        .long("overwrite-config-file")
                        .short("c")
                        .required(false)
                        .takes_value(true)
                        .help("Overwrite single keys of the scenario config"),
                ),
        )
        .subcommand(
            SubCommand::with_name("write-default-config")
                .about("Write the default scenario parameters to a YAML file")
                .arg(
                    Arg::with_name("OUTPUT_YAML")
                        .help("YAML file the parameters are written to")
                        .default_value("./dam-break-gate.yaml")
                        .takes_value(true)
                        .required(true),
                )
                .arg(
                    Arg::with_name("SCENARIO")
                        .long("scenario")
                        .takes_value(true)
                        .possible_values(&["dam-break-gate", "dam-break"])
                        .default_value("dam-break-gate")
                        .help("Which scenario the defaults are taken from"),
                ),
        )
        .get_matches();

    init_logging(matches.occurrences_of("v"));

    if let Some(run_matches) = matches.subcommand_matches("run") {
        run(run_matches)
    } else if let Some(subcmd_matches) = matches.subcommand_matches("write-default-config") {
        let yaml_path = subcmd_matches.value_of("OUTPUT_YAML").unwrap_or("./dam-break-gate.yaml");
        let params = match subcmd_matches.value_of("SCENARIO") {
            Some("dam-break") => ScenarioParams::dam_break(),
            _ => ScenarioParams::dam_break_gate(),
        };
        write_config(Path::new(yaml_path), &params)?;
        info!("wrote {:?} defaults to `{}`", params.scenario, yaml_path);
        Ok(())
    } else {
        unreachable!()
    }
}

fn init_logging(verbosity: u64) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("logging disabled: {}", e);
    }
}

fn run(run_matches: &ArgMatches) -> Result<()> {
    let parameter_file = run_matches
        .value_of("SCENARIO_CONFIG")
        .ok_or_else(|| Error::InvalidConfig("missing scenario config".to_string()))?;
    let params = load_config(
        Path::new(parameter_file),
        run_matches.value_of("OVERWRITE_CONFIG_FILE").map(Path::new),
    )?;
    debug!("{:?}", params);

    let max_seconds = match run_matches.value_of("MAX_SECONDS") {
        Some(s) => Some(
            s.parse::<f64>()
                .map_err(|e| Error::InvalidConfig(format!("--max-seconds `{}`: {}", s, e)))?,
        ),
        None => None,
    };
    let t_end = max_seconds.map_or(params.t_end, |s| s.min(params.t_end));
    let dt = params.dt;

    let mut scenario = Scenario::new(params)?;

    let a = Instant::now();
    let num_particles = scenario.generate_particles()?;
    let mut buffers = BufferList::new(num_particles);
    let hasher = scenario.grid_hasher();
    let ranges = scenario.pack_buffers(&mut buffers, &hasher);
    scenario.release_particles();

    let num_fluid = buffers.get::<InfoBuffer>().iter().filter(|info| info.is_fluid()).count();
    info!(
        "upload: {} {}B, {} {}B, {} {}B, {} {}B, {} fluid particles",
        PosBuffer::NAME,
        buffers.as_bytes::<PosBuffer>().len(),
        HashBuffer::NAME,
        buffers.as_bytes::<HashBuffer>().len(),
        VelBuffer::NAME,
        buffers.as_bytes::<VelBuffer>().len(),
        InfoBuffer::NAME,
        buffers.as_bytes::<InfoBuffer>().len(),
        num_fluid
    );
    info!(
        "{}: packed {} particles in {}msec, fluid slots {:?}",
        scenario.name(),
        ranges.total(),
        a.elapsed().as_secs_f32() * 1000.,
        ranges.get(ParticleClass::Fluid)
    );

    let num_boundaries = scenario.moving_boundaries().len();
    let mut step = 0;
    let mut t = 0.;
    while t < t_end {
        for index in 0..num_boundaries {
            let state = scenario.boundary_kinematics(t, dt, index)?;
            if step % REPORT_INTERVAL == 0 {
                info!(
                    "{:07}: t={:.4} {} velocity {:?} displacement {:?}",
                    step,
                    t,
                    state.class.as_str(),
                    state.velocity.as_slice(),
                    state.displacement.as_slice()
                );
            }
        }
        step += 1;
        t = step as f64 * dt;
    }

    for state in scenario.moving_boundaries() {
        println!(
            "{} final displacement {:?} after {} steps, origin now at {:?}",
            state.class.as_str(),
            state.displacement.as_slice(),
            step,
            state.moved_position(state.origin).as_slice()
        );
    }

    Ok(())
}

/// Reads the scenario YAML and replaces the top-level keys found in `overwrite_file`.
pub fn load_config(parameter_file: &Path, overwrite_file: Option<&Path>) -> Result<ScenarioParams> {
    let params_yaml = std::fs::read_to_string(parameter_file)?;
    let mut params_serde: serde_yaml::Value = serde_yaml::from_str(&params_yaml)?;

    if let Some(overwrite_file) = overwrite_file {
        let overwrite_str = std::fs::read_to_string(overwrite_file)?;
        let overwrite: BTreeMap<String, serde_yaml::Value> = serde_yaml::from_str(&overwrite_str)?;
        let mapping = params_serde
            .as_mapping_mut()
            .ok_or_else(|| Error::InvalidConfig("scenario config is not a mapping".to_string()))?;
        for (k, v) in overwrite.into_iter() {
            let key = serde_yaml::Value::String(k.clone());
            match mapping.get_mut(&key) {
                Some(slot) => *slot = v,
                // optional keys may be missing in the base file
                None => {
                    mapping.insert(key, v);
                }
            }
        }
    }

    let params: ScenarioParams = serde_yaml::from_value(params_serde)?;
    Ok(params)
}

pub fn write_config(path: &Path, params: &ScenarioParams) -> Result<()> {
    let yaml = serde_yaml::to_string(params)?;
    std::fs::write(path, yaml)?;
    Ok(())
}
