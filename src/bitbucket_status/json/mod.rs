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

// The version document a put step hands back to Concourse on stdout.

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct OutputVersion {
    pub version: Version,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct Version {
    #[serde(rename = "ref")]
    pub commit: String,
}

impl OutputVersion {
    pub fn for_commit(commit: &str) -> OutputVersion {
        OutputVersion {
            version: Version {
                commit: String::from(commit),
            },
        }
    }
}
