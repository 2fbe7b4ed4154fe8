//! Sandbox Document Composition
//!
//! Turns a [`SourceBundle`] into the artifacts a realm executes:
//!
//! - [`SandboxDocument`]: a self-contained HTML page for an iframe-style
//!   preview, relaying console traffic to the parent window.
//! - [`SandboxProgram`]: a standalone JavaScript program for a process
//!   realm, relaying console traffic as marked JSON lines on stdout.
//!
//! Both install the same instrumentation before user code runs: the
//! log/info/warn/error channels forward `{type, message}` and still print,
//! uncaught faults are reported with a line number, and the user script
//! sits inside a try/catch so nothing escapes the sandbox.

use crate::models::SourceBundle;

/// Prefix of relay lines on the sandbox's stdout (ASCII record separator)
pub const RELAY_MARKER: char = '\u{1e}';

/// File name user code is evaluated under; stack traces refer to it
pub const USER_SOURCE_FILE: &str = "playground.js";

const DOCUMENT_PROLOGUE: &str = r#"(function () {
  var relay = function (type, args) {
    window.parent.postMessage({ type: type, message: Array.prototype.join.call(args, ' ') }, '*');
  };
  var channels = { log: 'log', info: 'log', warn: 'warn', error: 'error' };
  Object.keys(channels).forEach(function (name) {
    var original = console[name];
    console[name] = function () {
      relay(channels[name], arguments);
      return original.apply(console, arguments);
    };
  });
  window.onerror = function (msg, url, line) {
    relay('error', ['Error: ' + msg + ' (Line ' + line + ')']);
    return false;
  };
})();"#;

const PROGRAM_PROLOGUE: &str = r#"'use strict';
const vm = require('vm');
const MARKER = '\u001e';
const USER_FILE = 'playground.js';

function relay(type, args) {
  process.stdout.write(MARKER + JSON.stringify({ type: type, message: Array.prototype.join.call(args, ' ') }) + '\n');
}

function lineOf(err) {
  const stack = err && err.stack ? String(err.stack) : '';
  const match = stack.match(/playground\.js:(\d+)/);
  return match ? match[1] : 'unknown';
}

function reportFault(err) {
  const text = err && err.message !== undefined ? err.message : String(err);
  relay('error', ['Error: ' + text + ' (Line ' + lineOf(err) + ')']);
}

// stdout carries relay lines only; the visible echo goes to stderr
const echo = new console.Console({ stdout: process.stderr, stderr: process.stderr });
const channels = { log: 'log', info: 'log', warn: 'warn', error: 'error' };
const sandboxConsole = {};
Object.keys(channels).forEach(function (name) {
  sandboxConsole[name] = function () {
    relay(channels[name], arguments);
    return echo[name].apply(echo, arguments);
  };
});

process.on('uncaughtException', reportFault);
process.on('unhandledRejection', reportFault);

const realm = vm.createContext({
  console: sandboxConsole,
  setTimeout: setTimeout,
  clearTimeout: clearTimeout,
  setInterval: setInterval,
  clearInterval: clearInterval,
  queueMicrotask: queueMicrotask,
});
"#;

/// HTML preview document for one bundle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SandboxDocument {
    html: String,
}

impl SandboxDocument {
    /// Compose the page: style in the head, markup then the instrumented
    /// script in the body
    pub fn compose(bundle: &SourceBundle) -> Self {
        let mut html = String::with_capacity(
            bundle.markup.len() + bundle.style.len() + bundle.script.len() + 1024,
        );
        html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<style>");
        html.push_str(&bundle.style);
        html.push_str("</style>\n</head>\n<body>\n");
        html.push_str(&bundle.markup);
        html.push_str("\n<script>\n");
        html.push_str(DOCUMENT_PROLOGUE);
        html.push_str("\ntry {\n");
        html.push_str(&escape_script_close(&bundle.script));
        html.push_str(
            "\n} catch (e) {\n  window.parent.postMessage({ type: 'error', message: e.toString() }, '*');\n}\n",
        );
        html.push_str("</script>\n</body>\n</html>\n");
        Self { html }
    }

    /// An empty preview
    pub fn blank() -> Self {
        Self {
            html: String::new(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.html
    }

    pub fn into_string(self) -> String {
        self.html
    }
}

/// Executable JavaScript program for a process realm
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SandboxProgram {
    source: String,
}

impl SandboxProgram {
    /// Compose the program for the script fragment of `bundle`
    ///
    /// The user script is embedded as a string literal and evaluated in a
    /// fresh `vm` context, so syntax errors are caught like runtime faults
    /// and reported line numbers are relative to the user's own source.
    pub fn compose(bundle: &SourceBundle) -> Self {
        // serde_json string encoding is a valid JavaScript string literal
        let literal = serde_json::to_string(&bundle.script)
            .unwrap_or_else(|_| String::from("\"\""));

        let mut source = String::with_capacity(PROGRAM_PROLOGUE.len() + literal.len() + 256);
        source.push_str(PROGRAM_PROLOGUE);
        source.push_str("const USER_SOURCE = ");
        source.push_str(&literal);
        source.push_str(";\n");
        source.push_str(
            "try {\n  vm.runInContext(USER_SOURCE, realm, { filename: USER_FILE });\n} catch (e) {\n  relay('error', [String(e)]);\n}\n",
        );
        Self { source }
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.source.as_bytes()
    }
}

/// Keep a literal `</script` inside user code from closing the block
fn escape_script_close(script: &str) -> String {
    script.replace("</script", "<\\/script")
}

/// Split a stdout line into a relay payload, if it is one
pub fn relay_payload(line: &str) -> Option<&str> {
    line.strip_prefix(RELAY_MARKER)
}
