#[cfg(target_arch = "wasm32")]
fn main() {
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    if let Err(err) = native::run() {
        eprintln!("brick_cli error: {err}");
        std::process::exit(1);
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use brickwall_engine::brick::{
        BrickWall, BrickWallDiagnostics, BrickWallOptions, PatternVariant, generate_brick_wall,
    };
    use brickwall_engine::export_wall;
    use brickwall_engine::geom::{
        CylinderSurface, FourPointSurface, PlaneSurface, Point3, Polyline, QuadMesh, Vec3,
    };
    use std::fmt::Write as _;
    use std::fs::{self, File};
    use std::io::{BufWriter, Write};
    use std::path::{Path, PathBuf};

    const SNAPSHOT_QUANTIZE: f64 = 1e-6;
    const SNAPSHOT_DECIMALS: usize = 6;

    const USAGE: &str = r#"brick_cli (brickwall-engine)

USAGE:
  brick_cli list
  brick_cli run <scenario|all> [options]

SCENARIOS:
  flat_wall
  twisted_panel
  curved_wall
  flattened_base

OPTIONS (run):
  --config <file>    Load BrickWallOptions from a JSON file (missing fields use defaults)
  --pattern <code>   Override the pattern code (0..6)
  --out-dir <dir>    Write <scenario>.obj, .snap and .json to this dir (required for `all`)
  --obj <path>       Write OBJ (single scenario only)
  --snap <path>      Write golden-style snapshot (single scenario only)
  --json <path>      Write the flattened bricks as JSON (single scenario only)
  --no-obj           Skip OBJ when using --out-dir
  --no-snap          Skip snapshot when using --out-dir
  --no-json          Skip JSON when using --out-dir
  --overwrite        Overwrite existing output files
  -h, --help         Show this help
"#;

    pub fn run() -> Result<(), String> {
        let args: Vec<String> = std::env::args().skip(1).collect();
        let mut args = Args::new(args);

        let Some(command) = args.next() else {
            print_usage();
            return Ok(());
        };

        match command.as_str() {
            "list" => {
                print_scenarios();
                Ok(())
            }
            "run" => cmd_run(&mut args),
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

    fn print_scenarios() {
        for scenario in Scenario::ALL {
            println!("{:<16} {}", scenario.name(), scenario.description());
        }
    }

    struct Outputs {
        obj: bool,
        snap: bool,
        json: bool,
        overwrite: bool,
    }

    fn cmd_run(args: &mut Args) -> Result<(), String> {
        let scenario_name = args.next().ok_or("missing scenario name")?;

        let mut config_path: Option<PathBuf> = None;
        let mut pattern: Option<i32> = None;
        let mut out_dir: Option<PathBuf> = None;
        let mut obj_path: Option<PathBuf> = None;
        let mut snap_path: Option<PathBuf> = None;
        let mut json_path: Option<PathBuf> = None;
        let mut outputs = Outputs {
            obj: true,
            snap: true,
            json: true,
            overwrite: false,
        };

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" => config_path = Some(PathBuf::from(args.value("--config")?)),
                "--pattern" => {
                    let raw = args.value("--pattern")?;
                    let code = raw
                        .parse::<i32>()
                        .map_err(|e| format!("invalid --pattern `{raw}`: {e}"))?;
                    pattern = Some(code);
                }
                "--out-dir" => out_dir = Some(PathBuf::from(args.value("--out-dir")?)),
                "--obj" => obj_path = Some(PathBuf::from(args.value("--obj")?)),
                "--snap" => snap_path = Some(PathBuf::from(args.value("--snap")?)),
                "--json" => json_path = Some(PathBuf::from(args.value("--json")?)),
                "--overwrite" => outputs.overwrite = true,
                "--no-obj" => outputs.obj = false,
                "--no-snap" => outputs.snap = false,
                "--no-json" => outputs.json = false,
                "-h" | "--help" => {
                    print_usage();
                    return Ok(());
                }
                other => return Err(format!("unknown option `{other}`\n\n{USAGE}")),
            }
        }

        let overrides = load_options(config_path.as_deref(), pattern)?;

        if let Some(dir) = out_dir.as_ref() {
            if obj_path.is_some() || snap_path.is_some() || json_path.is_some() {
                return Err("use either --out-dir or --obj/--snap/--json (not both)".to_string());
            }
            if !outputs.obj && !outputs.snap && !outputs.json {
                return Err("nothing to write (--no-obj, --no-snap and --no-json all set)".to_string());
            }

            fs::create_dir_all(dir).map_err(|e| format!("create out dir: {e}"))?;

            if scenario_name == "all" {
                for scenario in Scenario::ALL {
                    run_one_scenario_to_dir(*scenario, overrides.as_ref(), dir, &outputs)?;
                }
                return Ok(());
            }

            let scenario = Scenario::from_str(scenario_name.as_str())
                .ok_or_else(|| unknown_scenario(&scenario_name))?;
            return run_one_scenario_to_dir(scenario, overrides.as_ref(), dir, &outputs);
        }

        if scenario_name == "all" {
            return Err("`run all` requires --out-dir".to_string());
        }

        let scenario =
            Scenario::from_str(scenario_name.as_str()).ok_or_else(|| unknown_scenario(&scenario_name))?;
        let output = run_scenario(scenario, overrides.as_ref())?;

        if let Some(path) = snap_path.as_deref() {
            write_text_file(path, &output.snapshot, outputs.overwrite)?;
            eprintln!("wrote {}", path.display());
        } else {
            print!("{}", output.snapshot);
        }

        if let Some(path) = obj_path.as_deref() {
            write_obj_file(path, &output.wall, output.name, outputs.overwrite)?;
            eprintln!("wrote {}", path.display());
        }

        if let Some(path) = json_path.as_deref() {
            write_text_file(path, &to_json(&output.wall)?, outputs.overwrite)?;
            eprintln!("wrote {}", path.display());
        }

        eprintln!("{}: {}", output.name, output.wall.diagnostics.summary());
        Ok(())
    }

    fn run_one_scenario_to_dir(
        scenario: Scenario,
        overrides: Option<&BrickWallOptions>,
        dir: &Path,
        outputs: &Outputs,
    ) -> Result<(), String> {
        let output = run_scenario(scenario, overrides)?;

        if outputs.snap {
            let path = dir.join(format!("{}.snap", output.name));
            write_text_file(&path, &output.snapshot, outputs.overwrite)?;
            eprintln!("wrote {}", path.display());
        }

        if outputs.obj {
            let path = dir.join(format!("{}.obj", output.name));
            write_obj_file(&path, &output.wall, output.name, outputs.overwrite)?;
            eprintln!("wrote {}", path.display());
        }

        if outputs.json {
            let path = dir.join(format!("{}.json", output.name));
            write_text_file(&path, &to_json(&output.wall)?, outputs.overwrite)?;
            eprintln!("wrote {}", path.display());
        }

        eprintln!("{}: {}", output.name, output.wall.diagnostics.summary());
        Ok(())
    }

    fn load_options(path: Option<&Path>, pattern: Option<i32>) -> Result<Option<BrickWallOptions>, String> {
        let mut options = match path {
            Some(path) => {
                let text = fs::read_to_string(path).map_err(|e| format!("read {}: {e}", path.display()))?;
                let options: BrickWallOptions =
                    serde_json::from_str(&text).map_err(|e| format!("parse {}: {e}", path.display()))?;
                Some(options)
            }
            None => None,
        };

        if let Some(code) = pattern {
            PatternVariant::try_from(code).map_err(|e| e.to_string())?;
            options.get_or_insert_with(BrickWallOptions::default).pattern = code;
        }

        Ok(options)
    }

    fn unknown_scenario(name: &str) -> String {
        let mut msg = String::new();
        let _ = writeln!(msg, "unknown scenario `{name}`\n\navailable scenarios:");
        for scenario in Scenario::ALL {
            let _ = writeln!(msg, "  {}", scenario.name());
        }
        msg
    }

    fn to_json(wall: &BrickWall) -> Result<String, String> {
        serde_json::to_string_pretty(&export_wall(wall)).map_err(|e| format!("serialize json: {e}"))
    }

    fn write_text_file(path: &Path, text: &str, overwrite: bool) -> Result<(), String> {
        if path.exists() && !overwrite {
            return Err(format!(
                "refusing to overwrite existing file {} (use --overwrite)",
                path.display()
            ));
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| format!("create dir {}: {e}", parent.display()))?;
        }
        fs::write(path, normalize_snapshot_text(text)).map_err(|e| format!("write {}: {e}", path.display()))
    }

    /// One OBJ object per brick, quads kept as quads.
    fn write_obj_file(path: &Path, wall: &BrickWall, name: &str, overwrite: bool) -> Result<(), String> {
        for brick in wall.bricks.iter() {
            brick
                .mesh()
                .validate()
                .map_err(|e| format!("brick #{} mesh validation failed: {e}", brick.sequence()))?;
        }

        if path.exists() && !overwrite {
            return Err(format!(
                "refusing to overwrite existing file {} (use --overwrite)",
                path.display()
            ));
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| format!("create dir {}: {e}", parent.display()))?;
        }

        let file = File::create(path).map_err(|e| format!("create {}: {e}", path.display()))?;
        let mut w = BufWriter::new(file);

        writeln!(w, "# brickwall-engine brick_cli").map_err(|e| format!("write obj: {e}"))?;
        writeln!(w, "# {name}").map_err(|e| format!("write obj: {e}"))?;

        let mut base = 1u32;
        for brick in wall.bricks.iter() {
            let mesh = brick.mesh();
            writeln!(w, "o brick_{}_r{}_c{}", brick.sequence(), brick.row(), brick.column())
                .map_err(|e| format!("write obj: {e}"))?;

            for p in mesh.positions.iter().copied() {
                writeln!(w, "v {} {} {}", p[0], p[1], p[2]).map_err(|e| format!("write obj: {e}"))?;
            }
            for n in mesh.vertex_normals.iter().copied() {
                writeln!(w, "vn {} {} {}", n[0], n[1], n[2]).map_err(|e| format!("write obj: {e}"))?;
            }
            for face in &mesh.faces {
                let [a, b, c, d] = face.map(|idx| idx + base);
                writeln!(w, "f {a}//{a} {b}//{b} {c}//{c} {d}//{d}").map_err(|e| format!("write obj: {e}"))?;
            }

            base += u32::try_from(mesh.vertex_count()).map_err(|_| "too many vertices for OBJ".to_string())?;
        }

        w.flush().map_err(|e| format!("flush {}: {e}", path.display()))
    }

    fn normalize_snapshot_text(text: &str) -> String {
        let normalized = text.replace("\r\n", "\n");
        if normalized.ends_with('\n') {
            normalized
        } else {
            format!("{normalized}\n")
        }
    }

    fn quantize_f64(value: f64) -> f64 {
        if !value.is_finite() {
            return value;
        }
        let q = (value / SNAPSHOT_QUANTIZE).round() * SNAPSHOT_QUANTIZE;
        if q == 0.0 { 0.0 } else { q }
    }

    fn write_f64(out: &mut String, value: f64) {
        let value = quantize_f64(value);
        let _ = write!(out, "{value:.SNAPSHOT_DECIMALS$}");
    }

    fn write_vec3_line(out: &mut String, prefix: &str, v: [f64; 3]) {
        let _ = write!(out, "{prefix} ");
        write_f64(out, v[0]);
        out.push(' ');
        write_f64(out, v[1]);
        out.push(' ');
        write_f64(out, v[2]);
        out.push('\n');
    }

    fn write_options(out: &mut String, options: &BrickWallOptions) {
        let _ = writeln!(out, "options.row_count {}", options.row_count);
        let _ = writeln!(out, "options.column_count {}", options.column_count);
        let _ = write!(out, "options.horizontal_seam_indent ");
        write_f64(out, options.horizontal_seam_indent);
        out.push('\n');
        let _ = write!(out, "options.vertical_seam_indent ");
        write_f64(out, options.vertical_seam_indent);
        out.push('\n');
        let _ = writeln!(out, "options.first_row_horizontal {}", options.first_row_horizontal);
        let _ = write!(out, "options.seam_offset ");
        write_f64(out, options.seam_offset);
        out.push('\n');
        let _ = write!(out, "options.wall_thickness ");
        write_f64(out, options.wall_thickness);
        out.push('\n');
        let _ = writeln!(out, "options.pattern {}", options.pattern);
        let _ = writeln!(out, "options.degenerate_policy {:?}", options.degenerate_policy);
    }

    fn write_wall_diagnostics(out: &mut String, diag: &BrickWallDiagnostics) {
        let _ = writeln!(out, "wall_diag.sample_count {}", diag.sample_count);
        let _ = writeln!(out, "wall_diag.double_unit_count {}", diag.double_unit_count);
        let _ = writeln!(out, "wall_diag.single_unit_count {}", diag.single_unit_count);
        let _ = writeln!(out, "wall_diag.flipped_plane_count {}", diag.flipped_plane_count);
        let _ = write!(out, "wall_diag.max_fit_deviation ");
        write_f64(out, diag.max_fit_deviation);
        out.push('\n');
        let _ = write!(out, "wall_diag.mean_fit_deviation ");
        write_f64(out, diag.mean_fit_deviation);
        out.push('\n');
        let _ = writeln!(out, "wall_diag.skipped_count {}", diag.skipped_bricks.len());
        for (idx, skipped) in diag.skipped_bricks.iter().enumerate() {
            let _ = writeln!(
                out,
                "wall_diag.skipped.{idx} {} {} {:?} {}",
                skipped.row, skipped.column, skipped.unit, skipped.reason
            );
        }
        let _ = writeln!(out, "wall_diag.warning_count {}", diag.warnings.len());
        for (idx, warning) in diag.warnings.iter().enumerate() {
            let _ = writeln!(out, "wall_diag.warning.{idx} {warning}");
        }
    }

    fn write_mesh(out: &mut String, mesh: &QuadMesh) {
        let _ = writeln!(out, "mesh.positions {}", mesh.positions.len());
        for p in mesh.positions.iter().copied() {
            write_vec3_line(out, "p", p);
        }

        let _ = writeln!(out, "mesh.faces {}", mesh.faces.len());
        for [a, b, c, d] in mesh.faces.iter().copied() {
            let _ = writeln!(out, "f {a} {b} {c} {d}");
        }

        let _ = writeln!(out, "mesh.normals {}", mesh.vertex_normals.len());
        for n in mesh.vertex_normals.iter().copied() {
            write_vec3_line(out, "n", n);
        }
    }

    fn write_outline(out: &mut String, label: &str, outline: &Polyline) {
        let _ = writeln!(out, "{label} {}", outline.len());
        for p in &outline.points {
            write_vec3_line(out, "o", p.to_array());
        }
    }

    fn write_bricks(out: &mut String, wall: &BrickWall) {
        let _ = writeln!(out, "bricks {}", wall.bricks.len());
        for brick in wall.bricks.iter() {
            let _ = writeln!(
                out,
                "brick {} row {} column {} unit {:?} flipped {}",
                brick.sequence(),
                brick.row(),
                brick.column(),
                brick.unit(),
                brick.flipped()
            );
            let frame = brick.reference_frame();
            write_vec3_line(out, "frame.origin", frame.origin.to_array());
            write_vec3_line(out, "frame.z", frame.z_axis.to_array());
            write_vec3_line(out, "back_frame.origin", brick.back_reference_frame().origin.to_array());
            write_mesh(out, brick.mesh());
            write_outline(out, "outline.front", brick.front_outline());
            write_outline(out, "outline.back", brick.back_outline());
        }
    }

    fn snapshot(op: &str, sections: impl FnOnce(&mut String)) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "# brickwall-engine golden v1");
        let _ = writeln!(out, "op {op}");
        let _ = writeln!(out, "quantize {SNAPSHOT_QUANTIZE:.1e}");
        sections(&mut out);
        normalize_snapshot_text(&out)
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Scenario {
        FlatWall,
        TwistedPanel,
        CurvedWall,
        FlattenedBase,
    }

    impl Scenario {
        const ALL: &'static [Scenario] = &[
            Scenario::FlatWall,
            Scenario::TwistedPanel,
            Scenario::CurvedWall,
            Scenario::FlattenedBase,
        ];

        fn name(self) -> &'static str {
            match self {
                Scenario::FlatWall => "flat_wall",
                Scenario::TwistedPanel => "twisted_panel",
                Scenario::CurvedWall => "curved_wall",
                Scenario::FlattenedBase => "flattened_base",
            }
        }

        fn description(self) -> &'static str {
            match self {
                Scenario::FlatWall => "4 x 2 m plane, staggered bond",
                Scenario::TwistedPanel => "twisted bilinear patch, standard bond",
                Scenario::CurvedWall => "quarter cylinder, split faces",
                Scenario::FlattenedBase => "leaning patch with a level first course",
            }
        }

        fn from_str(name: &str) -> Option<Self> {
            Self::ALL.iter().copied().find(|scenario| scenario.name() == name)
        }

        fn default_options(self) -> BrickWallOptions {
            let base = BrickWallOptions::default();
            match self {
                Scenario::FlatWall => base,
                Scenario::TwistedPanel => BrickWallOptions {
                    row_count: 6,
                    column_count: 5,
                    pattern: PatternVariant::Standard.code(),
                    ..base
                },
                Scenario::CurvedWall => BrickWallOptions {
                    row_count: 5,
                    column_count: 6,
                    wall_thickness: 0.05,
                    pattern: PatternVariant::SplitFaces.code(),
                    ..base
                },
                Scenario::FlattenedBase => BrickWallOptions {
                    first_row_horizontal: true,
                    pattern: PatternVariant::StaggeredDiagonal.code(),
                    ..base
                },
            }
        }
    }

    struct ScenarioOutput {
        name: &'static str,
        wall: BrickWall,
        snapshot: String,
    }

    fn run_scenario(scenario: Scenario, overrides: Option<&BrickWallOptions>) -> Result<ScenarioOutput, String> {
        let options = overrides.cloned().unwrap_or_else(|| scenario.default_options());

        let wall = match scenario {
            Scenario::FlatWall => {
                let surface = PlaneSurface::new(Point3::ORIGIN, Vec3::new(4.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 2.0));
                generate_brick_wall(&surface, &options)
            }
            Scenario::TwistedPanel => {
                let surface = FourPointSurface::new(
                    Point3::new(0.0, 0.0, 0.0),
                    Point3::new(5.0, 0.0, 0.0),
                    Point3::new(0.0, 0.8, 3.0),
                    Point3::new(5.0, -0.8, 3.0),
                );
                generate_brick_wall(&surface, &options)
            }
            Scenario::CurvedWall => {
                let surface = CylinderSurface::new(
                    Point3::ORIGIN,
                    Vec3::new(0.0, 0.0, 2.5),
                    4.0,
                    std::f64::consts::FRAC_PI_2,
                )?;
                generate_brick_wall(&surface, &options)
            }
            Scenario::FlattenedBase => {
                let surface = FourPointSurface::new(
                    Point3::new(0.0, 0.0, 0.0),
                    Point3::new(4.0, 0.0, 0.0),
                    Point3::new(0.0, 0.6, 2.0),
                    Point3::new(4.0, 0.6, 2.0),
                );
                generate_brick_wall(&surface, &options)
            }
        }
        .map_err(|e| e.to_string())?;

        let name = scenario.name();
        let snap = snapshot(name, |out| {
            write_options(out, &options);
            write_wall_diagnostics(out, &wall.diagnostics);
            write_bricks(out, &wall);
        });

        Ok(ScenarioOutput {
            name,
            wall,
            snapshot: snap,
        })
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
