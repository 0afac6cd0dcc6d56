//! Task invocation from command-line arguments.
//!
//! A program using the engine registers its classes, freezes the
//! registry and hands parsed [`TaskArgs`] to [`run_task`]:
//!
//! ```ignore
//! fn main() -> anyhow::Result<()> {
//!     lattice_cli::init_tracing();
//!     let registry = build_registry()?.freeze();
//!     let args = TaskArgs::parse();
//!     let result = run_task(registry, &args)?;
//!     println!("{result}");
//!     Ok(())
//! }
//! ```
//!
//! The task is matched against runnable classes by exact or snake_case
//! name, so `lattice train_model epochs=10` runs `TrainModel`.

use crate::console::ConsolePrompt;
use crate::error::CliError;
use crate::overrides::parse_overrides;
use clap::Parser;
use lattice_component::{ComponentRegistry, ComponentTree, ConfigureOptions, Prompt};
use lattice_types::{key, ClassId, Conf, ConfigValue};
use std::sync::Arc;

/// Run a registered task.
#[derive(Parser, Debug)]
#[command(name = "lattice")]
#[command(version, about, long_about = None)]
pub struct TaskArgs {
    /// Prompt for fields the configuration leaves unresolved
    #[arg(short, long)]
    pub interactive: bool,

    /// Display name for the root component (defaults to the class name)
    #[arg(long)]
    pub name: Option<String>,

    /// Task class to run, by exact or snake_case name
    pub task: String,

    /// Configuration overrides: `key=value`, `--flag`, `--no-flag`
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub overrides: Vec<String>,
}

/// Look up, configure and run the requested task.
///
/// Interactive mode prompts on the terminal; everything else is driven
/// by the override arguments.
pub fn run_task(registry: Arc<ComponentRegistry>, args: &TaskArgs) -> Result<ConfigValue, CliError> {
    let mut console;
    let prompt: Option<&mut dyn Prompt> = if args.interactive {
        console = ConsolePrompt::new();
        Some(&mut console)
    } else {
        None
    };
    run_task_with(registry, args, prompt)
}

/// [`run_task`] with an explicit prompt, for embedding and tests.
pub fn run_task_with(
    registry: Arc<ComponentRegistry>,
    args: &TaskArgs,
    prompt: Option<&mut dyn Prompt>,
) -> Result<ConfigValue, CliError> {
    let class = match_task(&registry, &args.task)?;
    let conf = parse_overrides(&args.overrides)?;

    let mut tree = ComponentTree::new(registry);
    let root = tree.instantiate(class, Conf::new())?;
    tree.configure_with(
        root,
        conf,
        ConfigureOptions {
            name: args.name.clone(),
            prompt,
        },
    )?;
    tracing::info!(task = %tree.name_of(root), "task configured");
    Ok(tree.run(root)?)
}

fn match_task(registry: &ComponentRegistry, name: &str) -> Result<ClassId, CliError> {
    let runnable: Vec<ClassId> = registry
        .classes()
        .filter(|def| def.is_runnable() && !def.is_abstract())
        .map(|def| def.id())
        .collect();
    runnable
        .iter()
        .copied()
        .find(|&id| key::names_match(registry.class_name(id), name))
        .ok_or_else(|| {
            let mut available: Vec<String> = runnable
                .iter()
                .map(|&id| registry.class_name(id).to_owned())
                .collect();
            available.sort();
            CliError::UnknownTask {
                name: name.to_owned(),
                available,
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use lattice_component::testing::ScriptedPrompt;
    use lattice_component::{ComponentField, Field};
    use lattice_types::{assert_error_code, TypeSpec};

    fn registry() -> Arc<ComponentRegistry> {
        let mut reg = ComponentRegistry::new();
        let dataset = reg.define_abstract("Dataset").register().unwrap();
        reg.define("CifarDataset")
            .extends(dataset)
            .field("batch_size", Field::with(TypeSpec::Int, 32))
            .register()
            .unwrap();
        reg.define("TrainModel")
            .field("epochs", Field::new(TypeSpec::Int))
            .field("data", ComponentField::new(TypeSpec::Component(dataset)))
            .runnable(|tree, id| tree.get(id, "epochs"))
            .register()
            .unwrap();
        reg.freeze()
    }

    fn task_args(task: &str, overrides: &[&str]) -> TaskArgs {
        TaskArgs {
            interactive: false,
            name: None,
            task: task.to_owned(),
            overrides: overrides.iter().map(|s| (*s).to_owned()).collect(),
        }
    }

    #[test]
    fn runs_task_with_overrides() {
        let out = run_task_with(registry(), &task_args("TrainModel", &["epochs=10"]), None)
            .unwrap();
        assert_eq!(out, ConfigValue::Int(10));
    }

    #[test]
    fn snake_case_task_name_matches() {
        let out = run_task_with(
            registry(),
            &task_args("train_model", &["epochs=3", "data.batch_size=64"]),
            None,
        )
        .unwrap();
        assert_eq!(out, ConfigValue::Int(3));
    }

    #[test]
    fn unknown_task_lists_runnable_classes() {
        let err =
            run_task_with(registry(), &task_args("evaluate", &[]), None).unwrap_err();
        assert_error_code(&err, "CLI_UNKNOWN_TASK");
        assert!(err.to_string().contains("TrainModel"));
    }

    #[test]
    fn missing_field_surfaces_component_error() {
        let err = run_task_with(registry(), &task_args("TrainModel", &[]), None).unwrap_err();
        assert_error_code(&err, "COMPONENT_MISSING_VALUE");
    }

    #[test]
    fn scripted_prompt_fills_missing_fields() {
        let mut prompt = ScriptedPrompt::new().push_value(7);
        let out = run_task_with(
            registry(),
            &task_args("TrainModel", &[]),
            Some(&mut prompt),
        )
        .unwrap();
        assert_eq!(out, ConfigValue::Int(7));
        assert_eq!(prompt.asked(), ["TrainModel.epochs"]);
    }

    #[test]
    fn clap_parses_flags_before_task_and_overrides_after() {
        let args = TaskArgs::try_parse_from([
            "lattice",
            "--interactive",
            "--name",
            "exp1",
            "train_model",
            "epochs=10",
            "--no-shuffle",
        ])
        .unwrap();
        assert!(args.interactive);
        assert_eq!(args.name.as_deref(), Some("exp1"));
        assert_eq!(args.task, "train_model");
        assert_eq!(args.overrides, ["epochs=10", "--no-shuffle"]);
    }
}
