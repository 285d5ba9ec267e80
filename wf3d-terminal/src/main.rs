/// WF3D Terminal Viewer
///
/// Loads a Wavefront OBJ model (with its sibling MTL file when present)
/// and renders it as a wireframe in the terminal.
/// Controls:
///   - WASD: Move forward/back/left/right
///   - Space/Z: Move up/down
///   - Arrow Keys: Look around
///   - Q/ESC: Quit

use std::env;
use std::fs;
use std::io;
use std::path::Path;
use wf3d_core::{obj, Mesh, Model};
use wf3d_terminal::TerminalApp;

fn main() -> io::Result<()> {
    let args: Vec<String> = env::args().collect();

    let model = match args.get(1) {
        Some(path) => load_model(Path::new(path))?,
        None => {
            eprintln!("Usage: {} <obj-file>", args[0]);
            eprintln!("\nNo OBJ file provided, using default cube...");
            Model::from(Mesh::cube(2.0))
        }
    };

    println!("Loaded {} triangles", model.triangle_count());
    println!("Starting terminal viewer (press Q to quit)...");
    std::thread::sleep(std::time::Duration::from_secs(1));

    let mut app = TerminalApp::new(model)?;
    app.run()
}

fn load_model(path: &Path) -> io::Result<Model> {
    println!("Loading OBJ file: {}", path.display());

    let obj_source = fs::read_to_string(path).map_err(|e| {
        io::Error::new(
            io::ErrorKind::NotFound,
            format!("Failed to read OBJ file: {}", e),
        )
    })?;

    // A sibling .mtl file supplies the wireframe colors when it exists.
    let mtl_source = fs::read_to_string(path.with_extension("mtl")).ok();

    obj::parse_obj(&obj_source, mtl_source.as_deref()).map_err(|e| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("Failed to parse OBJ: {}", e),
        )
    })
}
