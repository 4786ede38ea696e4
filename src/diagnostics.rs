use crate::config::Config;
use crate::transform::ExportAction;

pub fn check(cfg: &Config) -> anyhow::Result<()> {
    let mut errors: Vec<String> = Vec::new();

    // Check 1: input readable
    match std::fs::File::open(&cfg.input) {
        Ok(_) => {}
        Err(e) => errors.push(format!("cannot open {}: {e}", cfg.input.display())),
    }

    // Check 2: every output directory exists
    for path in cfg.output_paths() {
        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => std::path::Path::new("."),
        };
        if !dir.is_dir() {
            errors.push(format!(
                "cannot write {}: directory {} does not exist",
                path.display(),
                dir.display()
            ));
        }
    }

    // Check 3: binary exports need a file
    if let Some(action @ (ExportAction::Download | ExportAction::Cose)) = cfg.action {
        if cfg.out.is_none() {
            errors.push(format!("--action {action} writes binary data\n  → pass --out <PATH>"));
        }
    }

    if errors.is_empty() {
        return Ok(());
    }

    for err in &errors {
        eprintln!("ERROR: {err}");
    }
    anyhow::bail!("{} preflight check(s) failed", errors.len());
}
