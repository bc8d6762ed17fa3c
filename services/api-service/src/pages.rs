//! HTML for the `/simulate` pages.

use load_simulator::ScenarioParameters;
use types::ids::RunId;

// Shared by both pages. A macro so it can feed `concat!`.
macro_rules! page_style {
    () => {
        r#"
    body { font-family: system-ui, -apple-system, "Segoe UI", sans-serif; background: #0f172a;
           color: #e5e7eb; display: flex; align-items: center; justify-content: center;
           min-height: 100vh; margin: 0; }
    .card { background: #020617; border-radius: 16px; padding: 24px 28px; max-width: 420px;
            width: 100%; border: 1px solid #1f2937; box-shadow: 0 18px 45px rgba(0,0,0,0.45); }
    h1 { font-size: 1.4rem; margin: 0 0 12px 0; color: #f9fafb; }
    p { margin: 0 0 16px 0; font-size: 0.9rem; color: #9ca3af; }
    label { display: block; font-size: 0.8rem; margin-bottom: 4px; color: #d1d5db; }
    input { width: 100%; padding: 8px 10px; border-radius: 8px; border: 1px solid #374151;
            background: #020617; color: #e5e7eb; font-size: 0.9rem; box-sizing: border-box;
            margin-bottom: 14px; }
    button { width: 100%; padding: 10px 12px; font-size: 0.95rem; border-radius: 999px; border: none;
             background: linear-gradient(135deg, #38bdf8, #6366f1); color: #0b1120;
             font-weight: 600; cursor: pointer; }
    .note { font-size: 0.75rem; color: #6b7280; margin-top: 12px; }
    a { color: #38bdf8; }
"#
    };
}

pub const SIMULATE_FORM: &str = concat!(
    r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <title>Observable Orders - Load Simulator</title>
  <style>"#,
    page_style!(),
    r#"</style>
</head>
<body>
  <div class="card">
    <h1>Load simulator</h1>
    <p>Generate orders against the API at a steady pace and reprocess a share of them.</p>
    <form method="post" action="/simulate/run">
      <label for="orders">Number of orders</label>
      <input id="orders" name="orders" type="number" min="0" value="50" required>
      <label for="reprocess_ratio">Reprocess ratio (%)</label>
      <input id="reprocess_ratio" name="reprocess_ratio" type="number" min="0" max="100" step="any" value="30" required>
      <label for="duration_seconds">Duration (seconds)</label>
      <input id="duration_seconds" name="duration_seconds" type="number" min="1" step="any" value="60" required>
      <button type="submit">Start simulation</button>
    </form>
    <p class="note">Runs execute in the background. See <a href="/simulate/runs">/simulate/runs</a> for their status.</p>
  </div>
</body>
</html>
"#
);

/// Confirmation page with a countdown that returns to the form once the
/// requested duration has elapsed.
pub fn run_started(run_id: RunId, params: &ScenarioParameters) -> String {
    // NaN and negative durations saturate to 0.
    let seconds = params.duration_seconds as u64;
    let percent = (params.reprocess_ratio * 100.0).round() as u32;

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <title>Simulation running...</title>
  <style>{style}</style>
</head>
<body>
  <div class="card">
    <h1>Simulation started</h1>
    <p>Generating {orders} orders over ~{seconds} seconds with ~{percent}% reprocessed.</p>
    <p>Remaining time: <span id="remaining">{seconds}</span> seconds</p>
    <p class="note">Run <a href="/simulate/runs/{run_id}">{run_id}</a>. You will be redirected back to the simulator when it is finished.</p>
  </div>
  <script>
    let remaining = {seconds};
    const el = document.getElementById('remaining');
    const timer = setInterval(() => {{
      remaining = Math.max(remaining - 1, 0);
      if (el) {{ el.textContent = remaining; }}
      if (remaining === 0) {{ clearInterval(timer); }}
    }}, 1000);
    setTimeout(() => {{ window.location.href = '/simulate'; }}, {seconds} * 1000);
  </script>
</body>
</html>
"#,
        style = page_style!(),
        orders = params.order_count,
        seconds = seconds,
        percent = percent,
        run_id = run_id,
    )
}
