//! Overlay page template
//!
//! The page is generated at startup so the refresh interval, theme values,
//! and placeholder cover come straight from configuration without editing
//! markup. It polls `/api/now-playing` and extrapolates playback position
//! client-side between polls using `elapsedSeconds` + `serverTime`.

use crate::config::OverlayConfig;

/// Render the overlay HTML for the given configuration
pub fn render_index(config: &OverlayConfig) -> String {
    let css_vars = config
        .theme
        .to_css_vars()
        .iter()
        .map(|(name, value)| format!("      {}: {};", name, value))
        .collect::<Vec<_>>()
        .join("\n");

    let placeholder_url = config
        .nothing_playing_placeholder
        .asset_url()
        .unwrap_or_default();

    let progress_html = if config.show_progress {
        r#"
      <div class="progress-track" id="progress-track">
        <div class="progress-fill" id="progress"></div>
      </div>
      <div class="time" id="time"></div>"#
    } else {
        ""
    };

    let progress_js_vars = if config.show_progress {
        r#"
    const progressEl = document.getElementById("progress");
    const timeEl = document.getElementById("time");"#
    } else {
        ""
    };

    let progress_js_functions = if config.show_progress {
        r#"
    function formatTime(totalSeconds) {
      const minutes = Math.floor(totalSeconds / 60);
      const seconds = Math.floor(totalSeconds % 60).toString().padStart(2, "0");
      return `${minutes}:${seconds}`;
    }

    function updateProgress() {
      if (!currentPayload || !currentPayload.isPlaying) {
        return;
      }
      const now = Date.now() / 1000;
      const duration = currentPayload.durationSeconds || 0;
      const sincePoll = currentPayload.isPaused ? 0 : now - currentPayload.serverTime;
      const elapsed = Math.min(
        duration,
        (currentPayload.elapsedSeconds || 0) + sincePoll
      );
      const percent = duration > 0 ? (elapsed / duration) * 100 : 0;
      progressEl.style.width = `${percent}%`;
      timeEl.textContent = duration ? `${formatTime(elapsed)} / ${formatTime(duration)}` : "";
    }"#
    } else {
        ""
    };

    let progress_update_call = if config.show_progress {
        "\n      updateProgress();"
    } else {
        ""
    };

    let progress_interval = if config.show_progress {
        "\n    setInterval(updateProgress, 500);"
    } else {
        ""
    };

    let progress_reset = if config.show_progress {
        r#"
        progressEl.style.width = "0%";
        timeEl.textContent = "";"#
    } else {
        ""
    };

    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Now Playing</title>
  <style>
    :root {{
      color-scheme: dark;
{css_vars}
    }}
    body {{
      margin: 0;
      font-family: var(--overlay-font-family);
      background: transparent;
      color: var(--overlay-text-color);
    }}
    .card {{
      display: flex;
      align-items: center;
      gap: var(--overlay-card-gap);
      padding: var(--overlay-card-padding-y) var(--overlay-card-padding-x);
      background: var(--overlay-card-bg);
      border-radius: var(--overlay-card-radius);
      width: fit-content;
      min-width: var(--overlay-card-min-width);
      box-shadow: var(--overlay-card-shadow);
    }}
    .cover {{
      width: var(--overlay-cover-size);
      height: var(--overlay-cover-size);
      border-radius: var(--overlay-cover-radius);
      object-fit: cover;
      background: rgba(255, 255, 255, 0.08);
      position: relative;
    }}
    .cover.default::before {{
      content: "\1F3B5";
      position: absolute;
      top: 50%;
      left: 50%;
      transform: translate(-50%, -50%);
      font-size: 32px;
      opacity: 0.6;
    }}
    .info {{
      display: flex;
      flex-direction: column;
      min-width: 180px;
    }}
    .title {{
      font-size: var(--overlay-title-size);
      font-weight: 600;
    }}
    .artist {{
      font-size: var(--overlay-artist-size);
      opacity: var(--overlay-muted-opacity);
      margin-top: 4px;
    }}
    .progress-track {{
      position: relative;
      height: var(--overlay-progress-height);
      border-radius: 999px;
      background: var(--overlay-progress-track-bg);
      margin-top: 12px;
      overflow: hidden;
    }}
    .progress-fill {{
      position: absolute;
      height: 100%;
      left: 0;
      top: 0;
      background: linear-gradient(90deg, var(--overlay-accent-start), var(--overlay-accent-end));
      width: 0%;
      transition: width 0.4s ease;
    }}
    .time {{
      font-size: var(--overlay-time-size);
      margin-top: 8px;
      opacity: 0.75;
    }}
  </style>
</head>
<body>
  <div class="card">
    <img class="cover" id="cover" alt="Cover art" />
    <div class="info">
      <div class="title" id="title">Loading…</div>
      <div class="artist" id="artist"></div>{progress_html}
    </div>
  </div>

  <script>
    const refreshMs = {refresh_ms};
    const placeholderCoverUrl = "{placeholder_url}";
    const titleEl = document.getElementById("title");
    const artistEl = document.getElementById("artist");
    const coverEl = document.getElementById("cover");{progress_js_vars}
    let currentPayload = null;{progress_js_functions}

    function showPlaceholderCover() {{
      if (placeholderCoverUrl) {{
        coverEl.src = placeholderCoverUrl;
        coverEl.classList.remove("default");
      }} else {{
        coverEl.removeAttribute("src");
        coverEl.classList.add("default");
      }}
    }}

    function applyPayload(payload) {{
      currentPayload = payload;
      if (!payload.isPlaying) {{
        titleEl.textContent = "Nothing playing";
        artistEl.textContent = "";
        showPlaceholderCover();{progress_reset}
        return;
      }}

      titleEl.textContent = payload.title;
      artistEl.textContent = payload.artist || "";
      if (payload.coverUrl) {{
        coverEl.src = payload.coverUrl;
        coverEl.classList.remove("default");
      }} else {{
        showPlaceholderCover();
      }}{progress_update_call}
    }}

    async function refreshNowPlaying() {{
      try {{
        const response = await fetch("/api/now-playing", {{ cache: "no-store" }});
        const payload = await response.json();
        applyPayload(payload);
      }} catch (error) {{
        titleEl.textContent = "Unable to reach server";
        artistEl.textContent = "";
        showPlaceholderCover();{progress_reset}
      }}
    }}

    refreshNowPlaying();
    setInterval(refreshNowPlaying, refreshMs);{progress_interval}
  </script>
</body>
</html>
"##,
        refresh_ms = u64::from(config.refresh_seconds) * 1000,
    )
}
