pub fn render_index() -> &'static str {
    INDEX_HTML
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Weekly Ledger</title>
  <style>
    :root {
      --bg-1: #f8f3e6;
      --ink: #2b2a28;
      --accent: #ff6b4a;
      --accent-2: #2f4858;
      --card: rgba(255, 255, 255, 0.86);
      --shadow: 0 24px 60px rgba(47, 72, 88, 0.18);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: linear-gradient(135deg, var(--bg-1), #ffe9d4 60%, #f9f2e9 100%);
      color: var(--ink);
      font-family: "Trebuchet MS", sans-serif;
      display: grid;
      place-items: center;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(900px, 100%);
      background: var(--card);
      border-radius: 28px;
      box-shadow: var(--shadow);
      padding: 36px;
      display: grid;
      gap: 28px;
    }

    h1 {
      font-family: "Georgia", serif;
      margin: 0;
    }

    h2 {
      margin: 0 0 12px;
      font-size: 1.3rem;
    }

    .subtitle {
      margin: 0;
      color: #5f5c57;
    }

    form.grid {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(160px, 1fr));
      gap: 12px;
      align-items: end;
    }

    label {
      display: grid;
      gap: 6px;
      font-size: 0.85rem;
      text-transform: uppercase;
      letter-spacing: 0.08em;
      color: #8b857d;
    }

    input, select {
      border: 1px solid rgba(47, 72, 88, 0.2);
      border-radius: 12px;
      padding: 10px 12px;
      font-size: 1rem;
    }

    button {
      border: none;
      border-radius: 999px;
      padding: 12px 18px;
      font-size: 1rem;
      font-weight: 600;
      cursor: pointer;
      background: var(--accent);
      color: white;
    }

    button.secondary {
      background: var(--accent-2);
    }

    table {
      width: 100%;
      border-collapse: collapse;
      background: white;
      border-radius: 16px;
      overflow: hidden;
    }

    th, td {
      padding: 8px 10px;
      text-align: right;
      border-bottom: 1px solid rgba(47, 72, 88, 0.08);
    }

    th:first-child, td:first-child {
      text-align: left;
    }

    .bar {
      display: flex;
      justify-content: space-between;
      align-items: center;
      gap: 12px;
    }

    .status {
      min-height: 1.2em;
      color: #6b645d;
    }

    .status[data-type="error"] {
      color: #c63b2b;
    }

    .status[data-type="ok"] {
      color: #2d7a4b;
    }

    [hidden] {
      display: none !important;
    }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <h1>Weekly Ledger</h1>
      <p class="subtitle">Weekly consultations, check-ins and income per office.</p>
    </header>

    <section id="login-view">
      <h2>Login</h2>
      <form id="login-form" class="grid">
        <label>Office<input id="login-name" autocomplete="username" /></label>
        <label>Password<input id="login-password" type="password" autocomplete="current-password" /></label>
        <button type="submit">Log in</button>
      </form>
    </section>

    <section id="ledger-view" hidden>
      <div class="bar">
        <strong id="who"></strong>
        <button id="logout" class="secondary" type="button">Log out</button>
      </div>

      <h2>New record</h2>
      <form id="record-form" class="grid">
        <label>Consultations<input id="consultations" type="number" min="0" step="1" value="0" /></label>
        <label>Check-ins<input id="checkins" type="number" min="0" step="1" value="0" /></label>
        <label>Income<input id="income" type="number" min="0" step="0.01" value="0" /></label>
        <label>Week<input id="week" placeholder="2025-W36 (blank = this week)" /></label>
        <button type="submit">Save record</button>
      </form>

      <div class="bar">
        <h2>Summary</h2>
        <select id="group-by">
          <option value="week">By week</option>
          <option value="date">By date</option>
        </select>
      </div>
      <table>
        <thead><tr><th>Period</th><th>Records</th><th>Consultations</th><th>Check-ins</th><th>Income</th><th>Earnings</th></tr></thead>
        <tbody id="summary-body"></tbody>
      </table>

      <h2>Records</h2>
      <table>
        <thead><tr><th>Office</th><th>Week</th><th>Consultations</th><th>Check-ins</th><th>Income</th><th>Earnings</th></tr></thead>
        <tbody id="records-body"></tbody>
      </table>
    </section>

    <div class="status" id="status"></div>
  </main>

  <script>
    const statusEl = document.getElementById('status');
    const loginView = document.getElementById('login-view');
    const ledgerView = document.getElementById('ledger-view');
    const groupByEl = document.getElementById('group-by');

    let token = sessionStorage.getItem('ledger-token');

    const setStatus = (message, type) => {
      statusEl.textContent = message;
      statusEl.dataset.type = type || '';
    };

    const api = async (path, options = {}) => {
      const headers = { 'content-type': 'application/json' };
      if (token) {
        headers.authorization = `Bearer ${token}`;
      }
      const res = await fetch(path, { ...options, headers });
      if (res.status === 401 && token) {
        showLogin();
      }
      if (!res.ok) {
        throw new Error((await res.text()) || 'Request failed');
      }
      return res.status === 204 ? null : res.json();
    };

    const cell = (value) => {
      const td = document.createElement('td');
      td.textContent = value;
      return td;
    };

    const fillTable = (bodyId, rows, columns, emptyText) => {
      const body = document.getElementById(bodyId);
      body.innerHTML = '';
      if (!rows.length) {
        const tr = document.createElement('tr');
        const td = cell(emptyText);
        td.colSpan = columns.length;
        tr.appendChild(td);
        body.appendChild(tr);
        return;
      }
      rows.forEach((row) => {
        const tr = document.createElement('tr');
        columns.forEach((column) => tr.appendChild(cell(row[column])));
        body.appendChild(tr);
      });
    };

    const refresh = async () => {
      const [summary, records] = await Promise.all([
        api(`/api/summary?group_by=${groupByEl.value}`),
        api('/api/records')
      ]);
      fillTable('summary-body', summary,
        ['label', 'record_count', 'total_consultations', 'total_checkins', 'total_income', 'total_earnings'],
        'No records yet.');
      fillTable('records-body', records,
        ['owner', 'week_label', 'consultations', 'checkins', 'income', 'earnings'],
        'No records yet.');
    };

    const showLogin = () => {
      token = null;
      sessionStorage.removeItem('ledger-token');
      ledgerView.hidden = true;
      loginView.hidden = false;
    };

    const showLedger = (session) => {
      document.getElementById('who').textContent =
        session.role === 'admin' ? 'Administrator (all offices)' : `Office: ${session.name}`;
      loginView.hidden = true;
      ledgerView.hidden = false;
      refresh().catch((err) => setStatus(err.message, 'error'));
    };

    document.getElementById('login-form').addEventListener('submit', (event) => {
      event.preventDefault();
      api('/api/login', {
        method: 'POST',
        body: JSON.stringify({
          name: document.getElementById('login-name').value,
          password: document.getElementById('login-password').value
        })
      })
        .then((session) => {
          token = session.token;
          sessionStorage.setItem('ledger-token', token);
          setStatus(`Welcome ${session.name}`, 'ok');
          showLedger(session);
        })
        .catch((err) => setStatus(err.message, 'error'));
    });

    document.getElementById('record-form').addEventListener('submit', (event) => {
      event.preventDefault();
      api('/api/records', {
        method: 'POST',
        body: JSON.stringify({
          consultations: Number(document.getElementById('consultations').value),
          checkins: Number(document.getElementById('checkins').value),
          income: Number(document.getElementById('income').value),
          week_label: document.getElementById('week').value
        })
      })
        .then(() => {
          setStatus('Record saved', 'ok');
          return refresh();
        })
        .catch((err) => setStatus(err.message, 'error'));
    });

    document.getElementById('logout').addEventListener('click', () => {
      api('/api/logout', { method: 'POST' })
        .catch(() => {})
        .finally(() => {
          showLogin();
          setStatus('', '');
        });
    });

    groupByEl.addEventListener('change', () => {
      refresh().catch((err) => setStatus(err.message, 'error'));
    });

    if (token) {
      api('/api/session').then(showLedger).catch(showLogin);
    }
  </script>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_calls_every_api_route() {
        let html = render_index();
        for route in ["/api/login", "/api/logout", "/api/session", "/api/records", "/api/summary"] {
            assert!(html.contains(route), "missing {route}");
        }
    }
}
