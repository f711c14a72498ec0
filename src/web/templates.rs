//! HTML templates for the web interface.
//!
//! A single embedded drawing page. The canvas keeps the grid's aspect ratio and
//! is posted to `app/` as a PNG data URI.

use crate::config::{Config, OutputMode};

/// Largest edge of the drawing canvas in CSS pixels
const CANVAS_EDGE: u32 = 480;

/// Canvas size preserving the grid aspect ratio
fn canvas_size(grid_width: u32, grid_height: u32) -> (u32, u32) {
    let longest = grid_width.max(grid_height).max(1);
    let cell = (CANVAS_EDGE / longest).max(1);
    (grid_width.max(1) * cell, grid_height.max(1) * cell)
}

fn mode_label(mode: OutputMode) -> &'static str {
    match mode {
        OutputMode::Direct => "direct (RGB rows)",
        OutputMode::SerpentineHex => "serpentine (hex columns)",
    }
}

/// Render the drawing page
pub fn render_drawing_page(config: &Config) -> String {
    let (canvas_width, canvas_height) = canvas_size(config.grid_width, config.grid_height);
    let endpoint = if config.has_endpoint_url() {
        config.endpoint_url.trim()
    } else {
        "not configured"
    };

    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>LED Grid Sketchpad</title>
    <style>
        * {{ box-sizing: border-box; }}
        body {{ font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; margin: 0; padding: 20px; background: #f5f5f5; }}
        .container {{ max-width: 800px; margin: 0 auto; background: white; padding: 24px; border-radius: 12px; box-shadow: 0 2px 8px rgba(0,0,0,0.1); }}
        h1 {{ color: #333; margin-top: 0; }}
        .status {{ background: #e3f2fd; padding: 16px; border-radius: 8px; margin-bottom: 20px; font-size: 14px; word-break: break-word; }}
        .alert {{ background: #c8e6c9; padding: 12px; border-radius: 8px; margin-top: 16px; color: #2e7d32; display: none; }}
        .alert.error {{ background: #ffcdd2; color: #c62828; }}
        canvas {{ border: 1px solid #ddd; border-radius: 8px; touch-action: none; cursor: crosshair; background: repeating-conic-gradient(#eee 0% 25%, #fff 0% 50%) 50% / 16px 16px; }}
        .tools {{ display: flex; gap: 10px; margin-top: 12px; align-items: center; flex-wrap: wrap; }}
        button {{ padding: 10px 20px; border: none; border-radius: 8px; font-size: 15px; cursor: pointer; font-weight: 600; }}
        .btn-primary {{ background: #4CAF50; color: white; }}
        .btn-red {{ background: #f44336; color: white; }}
        button:hover {{ opacity: 0.9; }}
        pre {{ background: #fafafa; padding: 12px; border-radius: 8px; font-size: 12px; overflow-x: auto; }}
    </style>
</head>
<body>
    <div class="container">
        <h1>LED Grid Sketchpad</h1>
        <div class="status">
            <strong>Grid:</strong> {grid_width}×{grid_height} &nbsp;|&nbsp; <strong>Output:</strong> {mode}<br>
            <strong>Controller:</strong> {endpoint}
        </div>
        <canvas id="pad" width="{canvas_width}" height="{canvas_height}"></canvas>
        <div class="tools">
            <input type="color" id="color" value="#ff0000">
            <input type="range" id="brush" min="1" max="64" value="16">
            <button type="button" class="btn-red" id="clear">Clear</button>
            <button type="button" class="btn-primary" id="send">Send</button>
        </div>
        <div class="alert" id="alert"></div>
        <pre id="result"></pre>
    </div>
    <script>
    const pad = document.getElementById('pad');
    const ctx = pad.getContext('2d');
    let drawing = false;

    function point(e) {{
        const rect = pad.getBoundingClientRect();
        return [(e.clientX - rect.left) * pad.width / rect.width, (e.clientY - rect.top) * pad.height / rect.height];
    }}

    pad.addEventListener('pointerdown', e => {{
        drawing = true;
        const [x, y] = point(e);
        ctx.beginPath();
        ctx.moveTo(x, y);
        ctx.lineTo(x, y);
        stroke();
    }});
    pad.addEventListener('pointermove', e => {{
        if (!drawing) return;
        const [x, y] = point(e);
        ctx.lineTo(x, y);
        stroke();
    }});
    window.addEventListener('pointerup', () => {{ drawing = false; }});

    function stroke() {{
        ctx.strokeStyle = document.getElementById('color').value;
        ctx.lineWidth = document.getElementById('brush').value;
        ctx.lineCap = 'round';
        ctx.lineJoin = 'round';
        ctx.stroke();
    }}

    document.getElementById('clear').addEventListener('click', () => {{
        ctx.clearRect(0, 0, pad.width, pad.height);
    }});

    function notify(message, isError) {{
        const alert = document.getElementById('alert');
        alert.textContent = message;
        alert.className = isError ? 'alert error' : 'alert';
        alert.style.display = 'block';
    }}

    document.getElementById('send').addEventListener('click', async () => {{
        const body = new URLSearchParams({{ image_data_uri: pad.toDataURL('image/png') }});
        try {{
            const res = await fetch('app/', {{ method: 'POST', body }});
            const data = await res.json();
            document.getElementById('result').textContent = JSON.stringify(data, null, 2);
            if (!res.ok) {{
                notify(data.error || ('Request failed: ' + res.status), true);
            }} else if (data.api_call && data.api_call.code) {{
                notify('Controller answered ' + data.api_call.code, data.api_call.code >= 400);
            }} else {{
                notify('Grid computed', false);
            }}
        }} catch (err) {{
            notify('Request failed: ' + err, true);
        }}
    }});
    </script>
</body>
</html>"##,
        grid_width = config.grid_width,
        grid_height = config.grid_height,
        mode = mode_label(config.output_mode),
        endpoint = escape_html(endpoint),
        canvas_width = canvas_width,
        canvas_height = canvas_height,
    )
}

/// Minimal HTML escaping for text nodes
fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
