//
// Copyright:: Copyright (c) 2016 Chef Software, Inc.
// License:: Apache License, Version 2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

// Everything said here goes to stderr: Concourse reads stdout as the
// resource protocol, so the only thing ever printed there is the final
// JSON document.

use std::io::Write;

fn say_term(mut t: Box<term::StderrTerminal>, color: &str, to_say: &str) {
    let color_const = match color {
        "green" => term::color::BRIGHT_GREEN,
        "yellow" => term::color::BRIGHT_YELLOW,
        "red" => term::color::BRIGHT_RED,
        "magenta" => term::color::BRIGHT_MAGENTA,
        "white" => term::color::WHITE,
        _ => term::color::WHITE,
    };
    let _ = t.fg(color_const);
    let _ = t.write_all(to_say.as_bytes());
    let _ = t.reset();
}

pub fn say(color: &str, to_say: &str) {
    match term::stderr() {
        Some(t) => say_term(t, color, to_say),
        None => eprint!("{}", to_say),
    }
}

pub fn sayln(color: &str, to_say: &str) {
    say(color, to_say);
    say(color, "\n");
}
