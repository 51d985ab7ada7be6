use criterion::{black_box, criterion_group, criterion_main, Criterion};
use bumpalo::Bump;
use ucode_options::ParseOptions;
use ucode_parser::Parser;

// A router-style template mixing text, expression blocks and alt-form control flow
const TEMPLATE_SOURCE: &str = r#"{%
import { escape, format } from "./util.uc";

let title = ctx.title ?? "Status";
const rows = ctx.rows || [];
-%}
<!DOCTYPE html>
<html>
<head>
  <title>{{ escape(title) }}</title>
</head>
<body>
  {# header block #}
  <h1 class="{{ ctx.dark ? 'dark' : 'light' }}">{{ title }}</h1>

  {% if (length(rows) == 0): %}
    <p>No entries.</p>
  {% elif (length(rows) > 100): %}
    <p>Showing the first 100 of {{ length(rows) }} entries.</p>
  {% else %}
    <p>{{ length(rows) }} entries.</p>
  {% endif %}

  <table>
  {% for (let i, row in rows): %}
    {% if (i >= 100) break; %}
    <tr class="{{ i % 2 ? 'odd' : 'even' }}">
      <td>{{ row.name }}</td>
      <td>{{ format("%d", row?.stats?.rx_bytes ?? 0) }}</td>
      <td>{{ `${row.up ? "up" : "down"} since ${row.since}` }}</td>
    </tr>
  {% endfor %}
  </table>

  {%- function badge(kind, ...labels): -%}
    <span class="badge {{ kind }}">{{ join(", ", labels) }}</span>
  {%- endfunction -%}

  {{ badge("info", "a", "b") }}
</body>
</html>
"#;

// A plain program exercising expressions and statements
const PROGRAM_SOURCE: &str = r#"
'use strict';

import * as fs from "fs";
import { cursor } from "uci";

const DEFAULTS = { retries: 3, timeout: 1500, verbose: false };

function merge(base, overrides) {
    let out = { ...base };
    for (let key in overrides)
        if (overrides[key] != null)
            out[key] = overrides[key];
    return out;
}

function parse_line(line) {
    let m = match(line, /^(\w+)\s*=\s*(.*)$/i);
    if (!m)
        return null;
    return [ m[1], trim(m[2]) ];
}

let config = merge(DEFAULTS, {});
let fd = fs.open("/etc/app.conf", "r");

try {
    let line;
    while ((line = fd?.read("line")) != null) {
        let kv = parse_line(line);
        switch (kv?.[0]) {
        case "retries":
            config.retries = +kv[1];
            break;
        case "timeout":
        case "delay":
            config.timeout = int(kv[1]) * 1000;
            break;
        default:
            warn(`unknown key ${kv?.[0]}\n`);
        }
    }
}
catch (e) {
    config.verbose = true;
}

let total = 0;
for (let i = 0; i < config.retries; i++) {
    total += i ** 2 << 1 | 0x0f;
    total &&= total > 0 ? total : -total;
}

const handlers = map([ "start", "stop" ], (name) => (ev) => {
    return { name, ev, at: time() };
});

export default { config, handlers, total };
"#;

fn bench_parse_markup(c: &mut Criterion) {
    let options = ParseOptions::markup();
    c.bench_function("parse_markup_template", |b| {
        b.iter(|| {
            let arena = Bump::new();
            let parser = Parser::new(&arena, "bench.ut", black_box(TEMPLATE_SOURCE), &options);
            let result = parser.parse_source_file();
            black_box(result);
        });
    });
}

fn bench_parse_program(c: &mut Criterion) {
    let options = ParseOptions::program();
    c.bench_function("parse_program_medium", |b| {
        b.iter(|| {
            let arena = Bump::new();
            let parser = Parser::new(&arena, "bench.uc", black_box(PROGRAM_SOURCE), &options);
            let result = parser.parse_source_file();
            black_box(result);
        });
    });
}

criterion_group!(benches, bench_parse_markup, bench_parse_program);
criterion_main!(benches);
