use crate::models::{Score, Status, StatusKind};
use chrono::NaiveDate;

pub fn render_index(today: NaiveDate, score: Score, status: Option<&Status>) -> String {
    let (status_type, status_message) = match status {
        Some(status) => (status_kind(status.kind), escape_html(&status.message)),
        None => ("", String::new()),
    };

    INDEX_HTML
        .replace("{{DATE}}", &today.to_string())
        .replace("{{SCORE}}", &score.to_string())
        .replace("{{STATUS_TYPE}}", status_type)
        .replace("{{STATUS}}", &status_message)
}

fn status_kind(kind: StatusKind) -> &'static str {
    match kind {
        StatusKind::Ok => "ok",
        StatusKind::Error => "error",
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Daily Performance</title>
  <style>
    @import url('https://fonts.googleapis.com/css2?family=Space+Grotesk:wght@400;500;600&family=Fraunces:wght@600&display=swap');

    :root {
      --bg-1: #eef3f8;
      --bg-2: #bcd3ee;
      --ink: #1f2a37;
      --accent: #3b82f6;
      --accent-2: #475569;
      --card: rgba(255, 255, 255, 0.88);
      --shadow: 0 24px 60px rgba(31, 42, 55, 0.16);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: radial-gradient(circle at top, var(--bg-2), transparent 60%),
        linear-gradient(135deg, var(--bg-1), #e2ebf5 60%, #f4f7fb 100%);
      color: var(--ink);
      font-family: "Space Grotesk", "Trebuchet MS", sans-serif;
      display: grid;
      place-items: center;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(860px, 100%);
      background: var(--card);
      backdrop-filter: blur(12px);
      border-radius: 28px;
      box-shadow: var(--shadow);
      padding: 36px;
      display: grid;
      gap: 28px;
      animation: rise 600ms ease;
    }

    header {
      display: flex;
      flex-direction: column;
      gap: 6px;
    }

    h1 {
      font-family: "Fraunces", "Georgia", serif;
      font-weight: 600;
      font-size: clamp(2rem, 4vw, 2.8rem);
      margin: 0;
    }

    h2 {
      margin: 0;
      font-size: 1.4rem;
    }

    .subtitle {
      margin: 0;
      color: #5b6573;
      font-size: 1rem;
    }

    .entry {
      background: white;
      border-radius: 20px;
      padding: 20px;
      border: 1px solid rgba(31, 42, 55, 0.08);
      display: grid;
      gap: 16px;
    }

    .slider {
      display: flex;
      flex-wrap: wrap;
      align-items: center;
      gap: 14px;
    }

    .slider label {
      font-size: 0.85rem;
      text-transform: uppercase;
      letter-spacing: 0.12em;
      color: #7b8594;
    }

    .slider input[type="range"] {
      flex: 1 1 220px;
      accent-color: var(--accent);
    }

    .slider output {
      font-size: 1.7rem;
      font-weight: 600;
      min-width: 3ch;
      text-align: right;
      color: var(--accent);
    }

    .actions {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(200px, 1fr));
      gap: 16px;
    }

    button {
      appearance: none;
      border: none;
      border-radius: 999px;
      padding: 16px 20px;
      font-size: 1rem;
      font-weight: 600;
      cursor: pointer;
      transition: transform 150ms ease, box-shadow 150ms ease;
      display: inline-flex;
      align-items: center;
      justify-content: center;
      gap: 10px;
      width: 100%;
    }

    button:active {
      transform: scale(0.98);
    }

    .btn-save {
      background: var(--accent);
      color: white;
      box-shadow: 0 10px 24px rgba(59, 130, 246, 0.3);
    }

    .btn-export {
      background: var(--accent-2);
      color: white;
      box-shadow: 0 10px 24px rgba(71, 85, 105, 0.3);
    }

    .status {
      font-size: 0.95rem;
      color: #5b6573;
      min-height: 1.2em;
    }

    .status[data-type="error"] {
      color: #c63b2b;
    }

    .status[data-type="ok"] {
      color: #2d7a4b;
    }

    .chart-area {
      display: grid;
      gap: 16px;
    }

    .chart-card {
      background: white;
      border-radius: 20px;
      padding: 16px;
      border: 1px solid rgba(31, 42, 55, 0.08);
    }

    #chart {
      width: 100%;
      height: 260px;
      display: block;
    }

    #chart text {
      font-family: "Space Grotesk", "Trebuchet MS", sans-serif;
    }

    .chart-line {
      fill: none;
      stroke: var(--accent);
      stroke-width: 3;
    }

    .chart-point {
      fill: white;
      stroke: var(--accent);
      stroke-width: 2;
    }

    .chart-grid {
      stroke: rgba(31, 42, 55, 0.12);
    }

    .chart-label {
      fill: #737d8a;
      font-size: 11px;
    }

    .chart-metrics {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(150px, 1fr));
      gap: 16px;
    }

    .stat {
      background: white;
      border-radius: 18px;
      padding: 18px;
      border: 1px solid rgba(31, 42, 55, 0.08);
      display: grid;
      gap: 8px;
    }

    .stat .label {
      font-size: 0.85rem;
      text-transform: uppercase;
      letter-spacing: 0.12em;
      color: #7b8594;
    }

    .stat .value {
      font-size: 1.5rem;
      font-weight: 600;
      color: var(--accent-2);
    }

    .empty {
      text-align: center;
      padding: 40px 0;
      color: #7b8594;
    }

    .records {
      max-height: 14rem;
      overflow-y: auto;
    }

    table {
      width: 100%;
      border-collapse: collapse;
    }

    th,
    td {
      padding: 8px 16px;
      text-align: left;
    }

    th {
      background: rgba(31, 42, 55, 0.06);
      font-size: 0.85rem;
      text-transform: uppercase;
      letter-spacing: 0.08em;
    }

    td.score,
    th.score {
      text-align: right;
      font-weight: 600;
    }

    tbody tr {
      border-top: 1px solid rgba(31, 42, 55, 0.08);
    }

    [hidden] {
      display: none !important;
    }

    @keyframes rise {
      from {
        opacity: 0;
        transform: translateY(18px);
      }
      to {
        opacity: 1;
        transform: translateY(0);
      }
    }

    @media (max-width: 600px) {
      .app {
        padding: 28px 22px;
      }
    }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <h1>Daily Performance</h1>
      <p class="subtitle">Rate today from 0 to 100 and watch the trend. Saving again today replaces today's score.</p>
    </header>

    <section class="entry">
      <form id="save-form" method="post" action="/score">
        <div class="slider">
          <label for="score">Today's score (<span id="date">{{DATE}}</span>)</label>
          <input type="range" id="score" name="score" min="0" max="100" step="1" value="{{SCORE}}" />
          <output id="score-value" for="score">{{SCORE}}</output>
        </div>
      </form>
      <div class="actions">
        <button class="btn-save" id="save-btn" type="submit" form="save-form">Save</button>
        <button class="btn-export" id="export-btn" type="button">Export</button>
      </div>
      <div class="status" id="status" data-type="{{STATUS_TYPE}}">{{STATUS}}</div>
    </section>

    <section class="chart-area">
      <div>
        <h2>Performance trend</h2>
        <p class="subtitle">One point per recorded day.</p>
      </div>
      <div class="chart-card">
        <div id="empty" class="empty">No data yet. Pick a score and save it.</div>
        <svg id="chart" viewBox="0 0 600 260" aria-label="Score chart" role="img" hidden></svg>
      </div>
      <div class="chart-metrics">
        <div class="stat">
          <span class="label">Days</span>
          <span class="value" id="metric-count">0</span>
        </div>
        <div class="stat">
          <span class="label">Latest</span>
          <span class="value" id="metric-latest">--</span>
        </div>
        <div class="stat">
          <span class="label">Average</span>
          <span class="value" id="metric-average">--</span>
        </div>
        <div class="stat">
          <span class="label">Best</span>
          <span class="value" id="metric-best">--</span>
        </div>
        <div class="stat">
          <span class="label">Worst</span>
          <span class="value" id="metric-worst">--</span>
        </div>
      </div>
    </section>

    <section class="chart-area" id="records-section" hidden>
      <h2>Records</h2>
      <div class="chart-card records">
        <table>
          <thead>
            <tr><th>Date</th><th class="score">Score</th></tr>
          </thead>
          <tbody id="records"></tbody>
        </table>
      </div>
    </section>
  </main>

  <script>
    const statusEl = document.getElementById('status');
    const scoreEl = document.getElementById('score');
    const scoreValueEl = document.getElementById('score-value');
    const dateEl = document.getElementById('date');
    const chartEl = document.getElementById('chart');
    const emptyEl = document.getElementById('empty');
    const recordsEl = document.getElementById('records');
    const recordsSection = document.getElementById('records-section');
    const saveForm = document.getElementById('save-form');
    const exportBtn = document.getElementById('export-btn');

    const setStatus = (message, type) => {
      statusEl.textContent = message;
      statusEl.dataset.type = type || '';
    };

    const escapeText = (value) => String(value)
      .replace(/&/g, '&amp;')
      .replace(/</g, '&lt;')
      .replace(/>/g, '&gt;');

    const renderLineChart = (records) => {
      const width = 600;
      const height = 260;
      const paddingX = 44;
      const paddingY = 34;
      const top = 24;

      const xStep = records.length > 1 ? (width - paddingX * 2) / (records.length - 1) : 0;
      const scaleY = (height - top - paddingY) / 100;
      const x = (index) => (records.length > 1 ? paddingX + index * xStep : width / 2);
      const y = (value) => height - paddingY - value * scaleY;

      const path = records
        .map((record, index) => `${index === 0 ? 'M' : 'L'} ${x(index).toFixed(2)} ${y(record.score).toFixed(2)}`)
        .join(' ');

      let grid = '';
      for (let value = 0; value <= 100; value += 25) {
        const yPos = y(value);
        grid += `<line class="chart-grid" x1="${paddingX}" y1="${yPos}" x2="${width - paddingX}" y2="${yPos}" />`;
        grid += `<text class="chart-label" x="${paddingX - 10}" y="${yPos + 4}" text-anchor="end">${value}</text>`;
      }

      const labelEvery = Math.max(1, Math.ceil(records.length / 8));
      const xLabels = records
        .map((record, index) => {
          if (index % labelEvery !== 0) {
            return '';
          }
          return `<text class="chart-label" x="${x(index)}" y="${height - paddingY + 18}" text-anchor="middle">${escapeText(record.date.slice(5))}</text>`;
        })
        .join('');

      const circles = records
        .map((record, index) => `<circle class="chart-point" cx="${x(index)}" cy="${y(record.score)}" r="4"><title>${escapeText(record.date)}: ${record.score}</title></circle>`)
        .join('');

      chartEl.innerHTML = `
        ${grid}
        <path class="chart-line" d="${path}" />
        ${circles}
        ${xLabels}
      `;
    };

    const describe = (record) => (record ? `${record.score} (${record.date.slice(5)})` : '--');

    const renderSummary = (summary) => {
      document.getElementById('metric-count').textContent = summary.count;
      document.getElementById('metric-latest').textContent = summary.latest ? summary.latest.score : '--';
      document.getElementById('metric-average').textContent = summary.average === null ? '--' : summary.average;
      document.getElementById('metric-best').textContent = describe(summary.best);
      document.getElementById('metric-worst').textContent = describe(summary.worst);
    };

    const renderRecords = (records) => {
      recordsEl.innerHTML = records
        .map((record) => `<tr><td>${escapeText(record.date)}</td><td class="score">${record.score}</td></tr>`)
        .join('');
    };

    const render = (data) => {
      const hasData = data.records.length > 0;
      emptyEl.hidden = hasData;
      chartEl.hidden = !hasData;
      recordsSection.hidden = !hasData;
      if (hasData) {
        renderLineChart(data.records);
      }
      renderRecords(data.records);
      renderSummary(data.summary);
    };

    const loadScores = async () => {
      const res = await fetch('/api/scores');
      if (!res.ok) {
        throw new Error('Unable to load scores');
      }
      const data = await res.json();
      dateEl.textContent = data.date;
      render(data);
      if (data.status) {
        setStatus(data.status.message, data.status.kind);
      }
    };

    const save = async () => {
      setStatus('Saving...', 'info');
      const res = await fetch('/api/scores', {
        method: 'POST',
        headers: { 'content-type': 'application/json' },
        body: JSON.stringify({ score: Number(scoreEl.value) })
      });

      if (!res.ok) {
        const msg = await res.text();
        throw new Error(msg || 'Request failed');
      }

      const data = await res.json();
      render(data);
      setStatus(data.status.message, data.status.kind);
    };

    const exportData = async () => {
      const res = await fetch('/api/export');
      if (!res.ok) {
        const msg = await res.text();
        throw new Error(msg || 'Export failed');
      }

      const blob = new Blob([await res.text()], { type: 'application/json' });
      const url = URL.createObjectURL(blob);
      const link = document.createElement('a');
      link.href = url;
      link.download = 'daily_performance.json';
      document.body.appendChild(link);
      link.click();
      document.body.removeChild(link);
      URL.revokeObjectURL(url);
      setStatus('Exported data', 'ok');
    };

    scoreEl.addEventListener('input', () => {
      scoreValueEl.textContent = scoreEl.value;
    });

    saveForm.addEventListener('submit', (event) => {
      event.preventDefault();
      save().catch((err) => setStatus(err.message, 'error'));
    });

    exportBtn.addEventListener('click', () => {
      exportData().catch((err) => setStatus(err.message, 'error'));
    });

    loadScores().catch((err) => setStatus(err.message, 'error'));
  </script>
</body>
</html>
"#;
