#![allow(missing_docs, dead_code)]

pub const ARTICLE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <title>Fish &amp; Chips &mdash; a history</title>
  <style>body { font: 12px/1.5 serif; }</style>
  <script type="text/javascript">if (a < b && c > d) { alert("</p>"); }</script>
</head>
<body>
  <h1 class="title">Fish&nbsp;&amp;&nbsp;Chips</h1>
  <!-- navigation removed -->
  <p>First served in <em>1860</em>, &ldquo;chippies&rdquo; cost &pound;0.02.</p>
  <p>Temperature &gt; 180&#176;C &amp; oil &lt; 3&#160;cm.</p>
  <![CDATA[raw <data> & stuff]]>
  <p>Unknown &entity; stays.</p>
</body>
</html>
"#;

/// Normalizes each line and drops the empty ones.
pub fn readable_lines(text: &str) -> String {
    text.lines()
        .map(markstrip::normalize_space)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
