//! Formula rendering.
//!
//! The recipe is a complete Homebrew formula regenerated from scratch every
//! cycle; the file at the target path is entirely replaced, never patched.
//! All version-independent text lives in a constant template baked into this
//! module, and the only interpolated values are the download URL, the
//! version, and the artifact checksum. Rendering the same artifact twice
//! yields byte-identical output.

use anyhow::Result;
use tera::{Context as TeraContext, Tera};

use crate::constants::download_url;
use crate::core::TapwatchError;
use crate::fetcher::ReleaseArtifact;

const FORMULA_TEMPLATE: &str = r##"require 'formula'

class Geoserver < Formula
  desc "Java server to share and edit geospatial data"
  homepage 'http://geoserver.org/'
  url '{{ url }}'
  sha256 '{{ checksum }}'

  def install
    libexec.install Dir['*']
    (bin/'geoserver').write <<-EOS.undent
      #!/bin/sh
      if [ -z "$1" ]; then
        echo "Usage: $ geoserver path/to/data/dir"
      else
        cd "#{libexec}" && java -DGEOSERVER_DATA_DIR=$1 -jar start.jar
      fi
    EOS
  end

  def caveats; <<-EOS.undent
    To start geoserver:
      geoserver path/to/data/dir
    See the Geoserver homepage for more setup information:
      brew home geoserver
    EOS
  end
end
"##;

/// Render the complete formula for an artifact.
///
/// Pure given its input. A template failure is a programming error in the
/// constant template, surfaced as [`TapwatchError::RecipeRenderFailed`].
pub fn render(artifact: &ReleaseArtifact) -> Result<String> {
    let mut context = TeraContext::new();
    context.insert("url", &download_url(&artifact.version));
    context.insert("checksum", &artifact.checksum);

    Tera::one_off(FORMULA_TEMPLATE, &context, false).map_err(|e| {
        TapwatchError::RecipeRenderFailed {
            reason: e.to_string(),
        }
        .into()
    })
}
