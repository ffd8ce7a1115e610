//! Per-element effect summary.

use crate::{
    AnalysisError, Field, FieldSet, Result,
    analyzer::{AliasAnalyzer, CopyAnalyzer, DropAnalyzer, ERROR_NAME, ReadAnalyzer, WriteAnalyzer},
    props::{Effects, ElementProps, ElementState, PathEffects},
};
use adn_config::{AnalysisConfig, Consistency, StateDependence, TrafficPath};
use adn_ir::{Direction, Program, Stmt};

/// Computes the properties of an element from its IR.
///
/// Both paths are analyzed independently. Errors carry the element name and the path.
pub fn analyze_element(program: &Program, config: &AnalysisConfig) -> Result<ElementProps> {
    trace!("analyzing element:\n{program}");
    let state = analyze_state(program).map_err(|e| e.in_state_of(&program.name))?;
    let mut effects = Effects::default();
    for path in [TrafficPath::Request, TrafficPath::Response] {
        let path_effects = analyze_path(program, path, config)
            .map_err(|e| e.in_element(&program.name, path))?;
        debug!(
            element = %program.name,
            %path,
            read = path_effects.read.fields().len(),
            write = path_effects.write.fields().len(),
            record = path_effects.record.fields().len(),
            drop = path_effects.drop,
            block = path_effects.block,
            copy = path_effects.copy,
            "analyzed element",
        );
        *effects.get_mut(path) = path_effects;
    }
    Ok(ElementProps { state, effects })
}

/// Returns the direction messages travel in on `path`.
pub fn forward_direction(path: TrafficPath) -> Direction {
    match path {
        TrafficPath::Request => Direction::Down,
        TrafficPath::Response => Direction::Up,
    }
}

fn analyze_path(
    program: &Program,
    path: TrafficPath,
    config: &AnalysisConfig,
) -> Result<PathEffects> {
    let body = match path {
        TrafficPath::Request => &program.req,
        TrafficPath::Response => &program.resp,
    };
    // Nothing but placeholders: the message passes through untouched.
    if body.iter().all(Stmt::is_placeholder) {
        return Ok(PathEffects::default());
    }

    let mut alias = AliasAnalyzer::new(config.rpc_target.as_str());
    alias.visit_block(body)?;
    let aliases = alias.aliases();

    let mut read = ReadAnalyzer::new(aliases.iter().cloned());
    read.visit_block(body)?;
    let mut write =
        WriteAnalyzer::new(aliases.iter().cloned()).with_messages(alias.renames().cloned());
    write.visit_block(body)?;

    // Sending a rename forwards the message; sending a derived alias emits a copy.
    let copies = CopyAnalyzer::new(alias.derived().iter().cloned()).visit_block(body);
    let sends = CopyAnalyzer::new(aliases.iter().cloned()).visit_block(body);

    let mut drop = DropAnalyzer::new([ERROR_NAME], forward_direction(path).reverse(), config);
    let drops = drop.visit_block(body);

    let read = collect_fields(read.all_fields(), "read")?;
    let write = collect_fields(write.all_fields(), "write")?;
    let (read, record) = if config.is_recording(&program.name) {
        (FieldSet::new(), read)
    } else {
        (read, FieldSet::new())
    };

    Ok(PathEffects {
        read,
        write,
        record,
        drop: drops,
        block: sends == 0,
        copy: copies > 0,
        probabilistic: drops && drop.random_included(),
    })
}

/// Collects analyzer output into a field set.
///
/// The same field is routinely accessed more than once in a handler, so repeats are merged here.
/// Only empty names are rejected.
fn collect_fields<'a>(names: impl Iterator<Item = &'a str>, set: &'static str) -> Result<FieldSet> {
    let mut fields = FieldSet::new();
    for name in names {
        if name.is_empty() {
            return Err(AnalysisError::malformed("field", format!("empty name in the {set} set")));
        }
        fields.insert(Field::new(name));
    }
    Ok(fields)
}

fn analyze_state(program: &Program) -> Result<ElementState> {
    let Some(decl) = program.state.first() else {
        return Ok(ElementState::default());
    };
    let consistency = decl.consistency.parse::<Consistency>().map_err(|_| {
        AnalysisError::malformed(
            "state declaration",
            format!("`{}` has unknown consistency `{}`", decl.name, decl.consistency),
        )
    })?;
    Ok(ElementState {
        stateful: true,
        consistency,
        combiner: decl.combiner.clone(),
        state_dependence: StateDependence::Independent,
        persistence: decl.persistence.clone(),
    })
}
