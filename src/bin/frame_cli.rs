#[cfg(target_arch = "wasm32")]
fn main() {
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    if let Err(err) = native::run() {
        eprintln!("frame_cli error: {err}");
        std::process::exit(1);
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use frame_engine::config::load_frame_config;
    use frame_engine::export::{
        StlFormat, export_archive, export_files, write_export_dir, write_file,
    };
    use frame_engine::frame::{FrameParameters, FrameStyle, RawFrameInput, RawNumber, assemble_frame};
    use std::path::PathBuf;

    const USAGE: &str = r#"frame_cli (frame-engine)

USAGE:
  frame_cli defaults
  frame_cli styles
  frame_cli build [--config <toml>] [frame options]
  frame_cli export [--config <toml>] [frame options] (--zip <path> | --out-dir <dir>) [--ascii] [--overwrite]

FRAME OPTIONS (override values from --config):
  --width <mm>          Opening width
  --height <mm>         Opening height
  --face-width <mm>     Visible face width of a rail
  --profile-depth <mm>  Depth of a rail
  --lip-width <mm>      Width of the rear lip
  --lip-depth <mm>      Depth of the rear lip
  --clearance <mm>      Gap per side around the panel
  --style <name>        minimal | bold | wood

EXPORT OPTIONS:
  --zip <path>          Write all STL files into one zip archive
  --out-dir <dir>       Write one STL file per piece into this dir
  --ascii               Write ASCII STL instead of binary
  --overwrite           Overwrite existing output files
  -h, --help            Show this help
"#;

    pub fn run() -> Result<(), String> {
        let args: Vec<String> = std::env::args().skip(1).collect();
        let mut args = Args::new(args);

        let Some(command) = args.next() else {
            print_usage();
            return Ok(());
        };

        match command.as_str() {
            "defaults" => {
                print_defaults();
                Ok(())
            }
            "styles" => {
                print_styles();
                Ok(())
            }
            "build" => cmd_build(&mut args),
            "export" => cmd_export(&mut args),
            "-h" | "--help" | "help" => {
                print_usage();
                Ok(())
            }
            other => Err(format!("unknown command `{other}`\n\n{USAGE}")),
        }
    }

    fn print_usage() {
        println!("{USAGE}");
    }

    fn print_defaults() {
        let params = FrameParameters::default();
        println!("width          = {}", params.width);
        println!("height         = {}", params.height);
        println!("face-width     = {}", params.face_width);
        println!("profile-depth  = {}", params.profile_depth);
        println!("lip-width      = {}", params.lip_width);
        println!("lip-depth      = {}", params.lip_depth);
        println!("clearance      = {}", params.clearance);
        println!("style          = {}", params.style);
    }

    fn print_styles() {
        for style in FrameStyle::ALL {
            let policy = style.policy();
            let mut features = Vec::new();
            if policy.bevel.is_some() {
                features.push("bevel");
            }
            if policy.corner_inserts {
                features.push("corner inserts");
            }
            if policy.woodgrain {
                features.push("woodgrain");
            }
            if features.is_empty() {
                features.push("plain");
            }
            println!(
                "{:<8} {} ({})",
                style.name(),
                features.join(", "),
                policy.material.color_hex()
            );
        }
    }

    fn cmd_build(args: &mut Args) -> Result<(), String> {
        let mut frame_args = FrameArgs::default();

        while let Some(arg) = args.next() {
            if frame_args.accept(&arg, args)? {
                continue;
            }
            match arg.as_str() {
                "-h" | "--help" => {
                    print_usage();
                    return Ok(());
                }
                other => return Err(format!("unknown option `{other}`\n\n{USAGE}")),
            }
        }

        let params = frame_args.parameters()?;
        let frame = assemble_frame(params).map_err(|e| format!("build frame: {e}"))?;
        let dims = frame.dimensions();

        println!("style: {}", params.style);
        println!(
            "opening {:.2} x {:.2} | rails {:.2} / {:.2} | outer {:.2} x {:.2}",
            dims.inner_width,
            dims.inner_height,
            dims.horizontal_length,
            dims.vertical_length,
            dims.outer_width,
            dims.outer_height
        );
        for piece in frame.pieces() {
            println!(
                "{}: vertices={} triangles={} | {}",
                piece.role,
                piece.mesh.vertex_count(),
                piece.mesh.triangle_count(),
                piece.diagnostics.summary()
            );
        }
        println!(
            "total: pieces={} vertices={} triangles={}",
            frame.pieces().len(),
            frame.vertex_count(),
            frame.triangle_count()
        );
        Ok(())
    }

    fn cmd_export(args: &mut Args) -> Result<(), String> {
        let mut frame_args = FrameArgs::default();
        let mut zip_path: Option<PathBuf> = None;
        let mut out_dir: Option<PathBuf> = None;
        let mut format = StlFormat::Binary;
        let mut overwrite = false;

        while let Some(arg) = args.next() {
            if frame_args.accept(&arg, args)? {
                continue;
            }
            match arg.as_str() {
                "--zip" => zip_path = Some(PathBuf::from(args.value("--zip")?)),
                "--out-dir" => out_dir = Some(PathBuf::from(args.value("--out-dir")?)),
                "--ascii" => format = StlFormat::Ascii,
                "--overwrite" => overwrite = true,
                "-h" | "--help" => {
                    print_usage();
                    return Ok(());
                }
                other => return Err(format!("unknown option `{other}`\n\n{USAGE}")),
            }
        }

        let params = frame_args.parameters()?;

        match (zip_path, out_dir) {
            (Some(path), None) => {
                let bytes = export_archive(params, format).map_err(|e| format!("export: {e}"))?;
                write_file(&bytes, &path, overwrite).map_err(|e| overwrite_hint(&e.to_string()))?;
                eprintln!("wrote {} ({} bytes)", path.display(), bytes.len());
                Ok(())
            }
            (None, Some(dir)) => {
                let files = export_files(params, format).map_err(|e| format!("export: {e}"))?;
                let paths = write_export_dir(&files, &dir, overwrite)
                    .map_err(|e| overwrite_hint(&e.to_string()))?;
                for path in paths {
                    eprintln!("wrote {}", path.display());
                }
                Ok(())
            }
            (Some(_), Some(_)) => Err("use either --zip or --out-dir (not both)".to_string()),
            (None, None) => Err(format!("export needs --zip or --out-dir\n\n{USAGE}")),
        }
    }

    fn overwrite_hint(message: &str) -> String {
        if message.ends_with("already exists") {
            format!("refusing to overwrite: {message} (use --overwrite)")
        } else {
            message.to_string()
        }
    }

    /// Frame options shared by `build` and `export`.
    #[derive(Default)]
    struct FrameArgs {
        config: Option<PathBuf>,
        overrides: RawFrameInput,
    }

    impl FrameArgs {
        /// Consume `arg` if it is a frame option. Returns whether it was.
        fn accept(&mut self, arg: &str, args: &mut Args) -> Result<bool, String> {
            let slot = match arg {
                "--config" => {
                    self.config = Some(PathBuf::from(args.value(arg)?));
                    return Ok(true);
                }
                "--style" => {
                    self.overrides.style = Some(args.value(arg)?);
                    return Ok(true);
                }
                "--width" => &mut self.overrides.width,
                "--height" => &mut self.overrides.height,
                "--face-width" => &mut self.overrides.face_width,
                "--profile-depth" => &mut self.overrides.profile_depth,
                "--lip-width" => &mut self.overrides.lip_width,
                "--lip-depth" => &mut self.overrides.lip_depth,
                "--clearance" => &mut self.overrides.clearance,
                _ => return Ok(false),
            };
            *slot = Some(RawNumber::from(args.value(arg)?.as_str()));
            Ok(true)
        }

        fn parameters(&self) -> Result<FrameParameters, String> {
            let base = match self.config.as_deref() {
                Some(path) => load_frame_config(path).map_err(|e| e.to_string())?,
                None => RawFrameInput::default(),
            };
            Ok(base.merged_with(self.overrides.clone()).to_parameters())
        }
    }

    struct Args {
        args: Vec<String>,
        pos: usize,
    }

    impl Args {
        fn new(args: Vec<String>) -> Self {
            Self { args, pos: 0 }
        }

        fn next(&mut self) -> Option<String> {
            let arg = self.args.get(self.pos)?.clone();
            self.pos += 1;
            Some(arg)
        }

        fn value(&mut self, flag: &str) -> Result<String, String> {
            self.next()
                .ok_or_else(|| format!("missing value for {flag}"))
        }
    }
}
