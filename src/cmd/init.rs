//! `edge-switch init`: generate a starter services file.

use crate::cli::InitArgs;
use crate::error::SwitchError;

pub fn execute(args: &InitArgs) -> Result<(), SwitchError> {
    if args.output.exists() {
        return Err(SwitchError::FileExists {
            path: args.output.clone(),
        });
    }

    std::fs::write(&args.output, TEMPLATE)?;
    println!("Created {}", args.output.display());
    Ok(())
}

/// `dictionary` is optional: the dictionary is looked up, or created,
/// from the service name on every run.
pub const TEMPLATE: &str = r#"{
  "services": [
    {
      "name": "www.example.com",
      "id": "SERVICE_ID"
    }
  ]
}
"#;
